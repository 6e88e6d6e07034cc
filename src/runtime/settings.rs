use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("jukon: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("jukon: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Admin session lifetime; out-of-range values fall back to a day.
pub fn session_window(hours: u64) -> chrono::Duration {
    i64::try_from(hours)
        .ok()
        .and_then(chrono::Duration::try_hours)
        .unwrap_or_else(|| chrono::Duration::hours(24))
}
