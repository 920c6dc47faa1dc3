use std::sync::{Mutex, OnceLock};

use tempfile::tempdir;

use super::load::{resolve_config_path, resolve_theme_path};
use super::schema::*;
use super::theme::{Theme, load_theme, save_theme};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
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
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert!(!s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatSetting::None);
    assert_eq!(s.playback.volume, 1.0);
    assert_eq!(s.network.timeout_secs, 10);
    assert_eq!(s.network.concurrency, 5);
    assert_eq!(s.controls.seek_seconds, 5);
    assert!(s.validate().is_ok());
}

#[test]
fn resolve_config_path_prefers_env_override() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn resolve_config_path_falls_back_to_xdg() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("ENCORE_CONFIG_PATH");
    let _g2 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn resolve_config_path_uses_home_dot_config_last() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("ENCORE_CONFIG_PATH");
    let _g2 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn env_variables_override_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/nonexistent/encore.toml");
    let _g2 = EnvGuard::set("ENCORE__PLAYBACK__SHUFFLE", "true");
    let _g3 = EnvGuard::set("ENCORE__NETWORK__CONCURRENCY", "3");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert_eq!(s.network.concurrency, 3);
}

#[test]
fn validate_rejects_zero_concurrency_and_bad_volume() {
    let mut s = Settings::default();
    s.network.concurrency = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(s.validate().is_err());
}

#[test]
fn theme_round_trips_through_the_state_file() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("theme");
    let _g = EnvGuard::set("ENCORE_THEME_PATH", path.to_str().unwrap());

    assert_eq!(resolve_theme_path().unwrap(), path);

    // No file yet: light is the default.
    assert_eq!(load_theme(), Theme::Light);

    save_theme(Theme::Dark);
    assert_eq!(load_theme(), Theme::Dark);

    save_theme(Theme::Light);
    assert_eq!(load_theme(), Theme::Light);
}

#[test]
fn unrecognized_theme_content_falls_back_to_light() {
    let _lock = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("theme");
    std::fs::write(&path, "solarized\n").unwrap();
    let _g = EnvGuard::set("ENCORE_THEME_PATH", path.to_str().unwrap());

    assert_eq!(load_theme(), Theme::Light);
}

#[test]
fn theme_strings_parse_and_toggle() {
    assert_eq!(Theme::from_str("dark"), Some(Theme::Dark));
    assert_eq!(Theme::from_str("  light \n"), Some(Theme::Light));
    assert_eq!(Theme::from_str("blue"), None);
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
}
