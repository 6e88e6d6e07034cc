use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use crate::config::{self, LoggingSettings};

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Route `log` records to the log file; the terminal belongs to the UI.
///
/// `RUST_LOG` overrides `logging.level`.
pub fn init(settings: &LoggingSettings) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.level.as_str()));
    builder.format_timestamp_millis();

    let path = settings.file.clone().or_else(config::default_log_path);
    match path.as_deref().map(|p| (p, open_log_file(p))) {
        Some((_, Ok(file))) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Some((p, Err(e))) => {
            eprintln!("jukon: cannot open log file {}, logging disabled: {e}", p.display());
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    let _ = builder.try_init();
}
