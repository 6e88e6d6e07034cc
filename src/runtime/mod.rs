use std::path::PathBuf;

use async_io::block_on;
use chrono::Utc;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, BlobStore, MediaResolver};
use crate::config::{self, LibrarySettings, LibrarySource};
use crate::library::HttpListing;
use crate::player::{Controller, ControllerOptions, TrackSource};
use crate::session::{AdminSecret, AdminSession};
use crate::storage::FileStorage;

mod event_loop;
mod logging;
mod settings;

pub type Player = Controller<AudioPlayer, FileStorage, HttpListing>;

fn track_source(library: &LibrarySettings) -> TrackSource<HttpListing> {
    match library.source {
        LibrarySource::Local => TrackSource::Local {
            defaults: library
                .default_tracks
                .iter()
                .map(|t| (t.name.clone(), t.src.clone()))
                .collect(),
        },
        LibrarySource::Remote => TrackSource::Remote {
            listing: HttpListing::new(library.listing_url.clone()),
            music_dir: library.music_dir.clone(),
            extensions: library.extensions.clone(),
        },
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init(&settings.logging);
    log::info!("jukon starting up");

    let storage_path = settings
        .storage
        .path
        .clone()
        .or_else(config::default_storage_path)
        .unwrap_or_else(|| PathBuf::from("jukon-storage.json"));
    let mut storage = FileStorage::open_or_empty(&storage_path);
    log::info!("using storage at {}", storage_path.display());

    let session = AdminSession::restore(
        &mut storage,
        settings::session_window(settings.admin.session_hours),
        Utc::now(),
    );
    if let Some(at) = session.established_at() {
        log::info!("restored admin session from {at}");
    }

    let resolver = MediaResolver::new(settings.library.asset_root.clone(), BlobStore::new());
    let media = AudioPlayer::new(resolver, settings.player.volume);
    let options = ControllerOptions {
        volume: settings.player.volume,
        advance_settle: std::time::Duration::from_millis(settings.player.advance_settle_ms),
        upload_settle: std::time::Duration::from_millis(settings.player.upload_settle_ms),
        secret: settings.admin.password.clone().and_then(AdminSecret::new),
    };
    let mut player: Player = Controller::new(media, storage, track_source(&settings.library), session, options);

    let mut app = App::new();
    if let Err(e) = block_on(player.initialize()) {
        app.error(e.to_string());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut player);

    player.teardown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::info!("jukon shut down");

    run_result
}
