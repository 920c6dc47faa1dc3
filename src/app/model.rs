//! Application model types: `App`, `PlaybackState` and `ArtStatus`.

use crate::audio::PlaybackHandle;
use crate::config::Theme;
use crate::metadata::{Artwork, MetadataEvent};
use crate::playlist::Track;

/// The playback state of the application, mirroring the audio thread.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Per-track artwork state.
///
/// Three-valued on purpose: a track that was checked and had no usable
/// picture is different from one the pipeline has not reached yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArtStatus {
    /// Not extracted yet.
    #[default]
    Pending,
    /// Checked; no embedded art (or extraction failed).
    Missing,
    Found(Artwork),
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    /// Parallel to `tracks`.
    pub art: Vec<ArtStatus>,
    /// Selection cursor (an index into `tracks`).
    pub selected: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,

    pub filter_mode: bool,
    pub filter_query: String,

    pub theme: Theme,
    pub info_window: bool,

    /// Placeholder shown instead of the track list when loading failed.
    pub load_error: Option<String>,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>, theme: Theme) -> Self {
        let art = vec![ArtStatus::Pending; tracks.len()];
        Self {
            tracks,
            art,
            selected: 0,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            filter_mode: false,
            filter_query: String::new(),
            theme,
            info_window: false,
            load_error: None,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Fold a metadata event into the track it belongs to.
    ///
    /// Parsed fields only overwrite when present; `None` metadata marks the
    /// artwork as checked-and-missing without touching display fields.
    pub fn apply_metadata(&mut self, event: MetadataEvent) {
        let Some(track) = self.tracks.get_mut(event.index) else {
            return;
        };

        match event.metadata {
            Some(meta) => {
                if meta.title.is_some() {
                    track.title = meta.title;
                }
                if meta.artist.is_some() {
                    track.artist = meta.artist;
                }
                if meta.duration.is_some() {
                    track.duration = meta.duration;
                }
                self.art[event.index] = match meta.artwork {
                    Some(art) => ArtStatus::Found(art),
                    None => ArtStatus::Missing,
                };
            }
            None => self.art[event.index] = ArtStatus::Missing,
        }
    }

    /// Visible track indices: the playlist order, narrowed by the filter.
    ///
    /// Shuffle never reorders the visible list; it only changes navigation.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim().to_lowercase();
        if query.is_empty() {
            return (0..self.tracks.len()).collect();
        }

        (0..self.tracks.len())
            .filter(|&i| self.tracks[i].name.to_lowercase().contains(&query))
            .collect()
    }

    /// Move selection to the next visible track, wrapping.
    pub fn select_next(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(p) => display[(p + 1) % display.len()],
            None => display[0],
        };
    }

    /// Move selection to the previous visible track, wrapping.
    pub fn select_prev(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(0) | None => display[display.len() - 1],
            Some(p) => display[p - 1],
        };
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }

    pub fn toggle_info_window(&mut self) {
        self.info_window = !self.info_window;
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the active filter and keep the selection on a visible track.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Keep `selected` inside the filtered view; jump to the first visible
    /// track when the filter hid it.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }
        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}
