//! The persisted theme preference.
//!
//! A single `light`|`dark` string in its own state file, read once at
//! startup and written back whenever the user toggles the theme.

use std::fs;

use tracing::debug;

use super::load::resolve_theme_path;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Read the saved theme; anything unreadable or unrecognized means light.
pub fn load_theme() -> Theme {
    resolve_theme_path()
        .and_then(|p| fs::read_to_string(p).ok())
        .and_then(|s| Theme::from_str(&s))
        .unwrap_or(Theme::Light)
}

/// Persist the theme. Failures are logged and otherwise ignored; losing a
/// theme preference is not worth interrupting playback for.
pub fn save_theme(theme: Theme) {
    let Some(path) = resolve_theme_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(err) = fs::write(&path, theme.as_str()) {
        debug!(path = %path.display(), %err, "failed to persist theme");
    }
}
