use std::path::PathBuf;
use std::time::Duration;

/// Shown when a track has no parsed artist tag.
pub const DEFAULT_ARTIST: &str = "Unknown Artist";

/// Where a track's audio lives. Immutable once the playlist is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    /// Stable identifier used as the metadata cache key.
    pub fn locator(&self) -> String {
        match self {
            Source::Url(u) => u.clone(),
            Source::Path(p) => p.display().to_string(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }
}

/// A single playlist entry.
///
/// `name` comes from the track list; `title`, `artist` and `duration` are
/// filled in later by the metadata pipeline when the file carries tags.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: usize,
    pub source: Source,
    pub name: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    pub fn new(id: usize, source: Source, name: String) -> Self {
        Self {
            id,
            source,
            name,
            title: None,
            artist: None,
            duration: None,
        }
    }

    /// Parsed title, falling back to the track-list name.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.name,
        }
    }

    /// Parsed artist, falling back to a fixed default.
    pub fn display_artist(&self) -> &str {
        match self.artist.as_deref() {
            Some(a) if !a.trim().is_empty() => a,
            _ => DEFAULT_ARTIST,
        }
    }
}
