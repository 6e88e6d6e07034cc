use super::load::{default_config_path, default_storage_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_jukon_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("JUKON_CONFIG_PATH", "/tmp/jukon-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/jukon-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("jukon")
            .join("config.toml")
    );
}

#[test]
fn default_storage_path_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_storage_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local/share")
            .join("jukon")
            .join("storage.json")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
volume = 0.8
advance_settle_ms = 100

[admin]
session_hours = 2

[library]
source = "remote"
music_dir = "/audio"
extensions = ["mp3"]
listing_url = "https://example.test/contents/public/audio"

[[library.default_tracks]]
name = "Intro"
src = "/audio/intro.mp3"

[ui]
header_text = "hello"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("JUKON_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("JUKON__ADMIN__PASSWORD");

    let s = Settings::load().unwrap();
    assert!((s.player.volume - 0.8).abs() < f32::EPSILON);
    assert_eq!(s.player.advance_settle_ms, 100);
    assert_eq!(s.player.upload_settle_ms, 500);
    assert_eq!(s.admin.session_hours, 2);
    assert_eq!(s.admin.password, None);
    assert_eq!(s.library.source, LibrarySource::Remote);
    assert_eq!(s.library.music_dir, "/audio");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert_eq!(s.library.default_tracks.len(), 1);
    assert_eq!(s.library.default_tracks[0].name, "Intro");
    assert_eq!(s.ui.header_text, "hello");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_provides_admin_password() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[admin]\nsession_hours = 24\n").unwrap();

    let _g1 = EnvGuard::set("JUKON_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("JUKON__ADMIN__PASSWORD", "open-sesame");

    let s = Settings::load().unwrap();
    assert_eq!(s.admin.password.as_deref(), Some("open-sesame"));
}

#[test]
fn defaults_seed_two_demo_tracks_and_local_source() {
    let s = Settings::default();
    assert_eq!(s.library.source, LibrarySource::Local);
    assert_eq!(s.library.default_tracks.len(), 2);
    assert_eq!(s.library.default_tracks[0].src, "/music/demo1.mp3");
    assert_eq!(s.admin.session_hours, 24);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_remote_source_without_listing_url() {
    let mut s = Settings::default();
    s.library.source = LibrarySource::Remote;
    assert!(s.validate().is_err());

    s.library.listing_url = Some("https://example.test/list".to_string());
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_volume_and_zero_session() {
    let mut s = Settings::default();
    s.player.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.admin.session_hours = 0;
    assert!(s.validate().is_err());
}
