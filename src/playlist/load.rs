use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::model::{Source, Track};

/// Failures while loading the track list. All of them are recoverable: the
/// caller starts with an empty playlist and shows a placeholder instead.
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("failed to read track list: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch track list: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("track list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One element of the JSON track list. `display`/`file` are accepted as
/// aliases so lists written for other players keep working.
#[derive(Debug, Deserialize)]
struct TrackEntry {
    #[serde(alias = "display")]
    name: Option<String>,
    #[serde(alias = "file")]
    url: String,
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Resolve an entry's location against the track list's own location.
///
/// Absolute URLs and absolute paths pass through; relative entries are joined
/// to the directory (or URL prefix) the list was loaded from.
fn resolve_source(entry: &str, base: &ListBase) -> Source {
    if is_url(entry) {
        return Source::Url(entry.to_string());
    }

    match base {
        ListBase::Url(prefix) => Source::Url(format!("{prefix}{entry}")),
        ListBase::Dir(dir) => {
            let p = Path::new(entry);
            if p.is_absolute() {
                Source::Path(p.to_path_buf())
            } else {
                Source::Path(dir.join(p))
            }
        }
    }
}

enum ListBase {
    /// URL prefix up to and including the last `/`.
    Url(String),
    /// Directory containing the local track-list file.
    Dir(PathBuf),
}

fn fallback_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let stem = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    let stem = stem.split('.').next().unwrap_or(stem);
    if stem.is_empty() {
        "UNKNOWN".to_string()
    } else {
        stem.to_string()
    }
}

/// Load the track list from `location`: an HTTP(S) URL or a local file path.
pub fn load(location: &str) -> Result<Vec<Track>, PlaylistError> {
    let (entries, base) = if is_url(location) {
        let entries: Vec<TrackEntry> = reqwest::blocking::get(location)?.error_for_status()?.json()?;
        let prefix = match location.rfind('/') {
            Some(i) => location[..=i].to_string(),
            None => String::new(),
        };
        (entries, ListBase::Url(prefix))
    } else {
        let text = fs::read_to_string(location)?;
        let entries: Vec<TrackEntry> = serde_json::from_str(&text)?;
        let dir = Path::new(location)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        (entries, ListBase::Dir(dir))
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(id, e)| {
            let name = match e.name {
                Some(n) if !n.trim().is_empty() => n,
                _ => fallback_name(&e.url),
            };
            Track::new(id, resolve_source(&e.url, &base), name)
        })
        .collect())
}
