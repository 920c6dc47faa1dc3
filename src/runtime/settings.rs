use tracing::warn;

use crate::config;

/// Load settings, falling back to defaults on any problem. Configuration is
/// optional; a broken file should never prevent the player from starting.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!(%msg, "invalid config, using defaults");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(err) => {
            warn!(%err, "failed to load config, using defaults");
            config::Settings::default()
        }
    }
}
