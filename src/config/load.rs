use std::{env, path::PathBuf};

use super::schema::Settings;

impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ENCORE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.network.concurrency == 0 {
            return Err("network.concurrency must be >= 1".to_string());
        }
        if self.network.timeout_secs == 0 {
            return Err("network.timeout_secs must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err("playback.volume must be within [0, 1]".to_string());
        }
        Ok(())
    }
}

/// Resolve a file under the app config dir, honoring an env override.
///
/// `override_var` names an environment variable holding a full path; when it
/// is unset the file lives under `$XDG_CONFIG_HOME/encore/` (or
/// `~/.config/encore/`).
fn resolve_app_file(override_var: &str, file_name: &str) -> Option<PathBuf> {
    if let Some(p) = env::var_os(override_var) {
        return Some(PathBuf::from(p));
    }

    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("encore").join(file_name))
}

/// Config path: `ENCORE_CONFIG_PATH` or the XDG default.
pub fn resolve_config_path() -> Option<PathBuf> {
    resolve_app_file("ENCORE_CONFIG_PATH", "config.toml")
}

/// Theme state file: `ENCORE_THEME_PATH` or the XDG default.
pub fn resolve_theme_path() -> Option<PathBuf> {
    resolve_app_file("ENCORE_THEME_PATH", "theme")
}

/// Log file: `ENCORE_LOG_PATH` or the XDG default. The TUI owns the
/// terminal, so logs never go to stdout/stderr.
pub fn resolve_log_path() -> Option<PathBuf> {
    resolve_app_file("ENCORE_LOG_PATH", "encore.log")
}
