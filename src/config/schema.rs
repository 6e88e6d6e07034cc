use std::path::PathBuf;

use serde::Deserialize;

/// Top-level player settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jukon/config.toml` or `~/.config/jukon/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JUKON__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub admin: AdminSettings,
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Initial output volume in `[0, 1]`.
    pub volume: f32,
    /// Delay between switching tracks with next/prev and the autoplay attempt (milliseconds).
    pub advance_settle_ms: u64,
    /// Delay between an upload and its autoplay attempt (milliseconds).
    pub upload_settle_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            advance_settle_ms: 300,
            upload_settle_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Admin password. Admin mode is disabled while this is unset.
    ///
    /// Prefer `JUKON__ADMIN__PASSWORD` over writing it into the config file.
    pub password: Option<String>,
    /// How long an admin session survives restarts (hours).
    pub session_hours: u64,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            password: None,
            session_hours: 24,
        }
    }
}

/// Where the track list comes from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibrarySource {
    /// Built-in defaults plus admin uploads persisted in local storage.
    #[serde(alias = "admin", alias = "uploads")]
    Local,
    /// Remote directory listing, refreshed on demand.
    #[serde(alias = "listing", alias = "sync")]
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultTrack {
    pub name: String,
    pub src: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    pub source: LibrarySource,
    /// Directory served as the static asset root; `/music/a.mp3` resolves below it.
    pub asset_root: PathBuf,
    /// Asset directory that remote listing entries are mapped into.
    pub music_dir: String,
    /// Recognized audio extensions for listing entries (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Directory-listing endpoint used by the remote source.
    pub listing_url: Option<String>,
    /// Built-in tracks, in order. They get `default-1`, `default-2`, ... ids.
    pub default_tracks: Vec<DefaultTrack>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            source: LibrarySource::Local,
            asset_root: PathBuf::from("public"),
            music_dir: "/music".to_string(),
            extensions: vec!["mp3".into(), "wav".into(), "ogg".into(), "m4a".into()],
            listing_url: None,
            default_tracks: vec![
                DefaultTrack {
                    name: "Demo Track 1".to_string(),
                    src: "/music/demo1.mp3".to_string(),
                },
                DefaultTrack {
                    name: "Demo Track 2".to_string(),
                    src: "/music/demo2.mp3".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Override for the local storage file.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Override for the log file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ JUKON BEAM ~ ".to_string(),
            volume_step: 0.1,
        }
    }
}
