//! Audio-related small types and handles.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What happens when the current track finishes on its own.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop at the end of the playback order.
    None,
    /// Restart the current track.
    One,
    /// Wrap around to the start of the playback order.
    All,
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::None
    }
}

/// Playback rates cycled by [`AudioCmd::CycleRate`], in order.
pub const PLAYBACK_RATES: [f32; 5] = [0.75, 1.0, 1.25, 1.5, 2.0];

/// Coarse volume bucket for display purposes.
///
/// Muted wins over everything; below that the cutoffs are fixed at 0.33 and
/// 0.66. Presentation policy only, but kept stable so the UI is predictable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeTier {
    Muted,
    Low,
    Medium,
    High,
}

impl VolumeTier {
    pub fn for_level(muted: bool, volume: f32) -> Self {
        if muted || volume == 0.0 {
            VolumeTier::Muted
        } else if volume < 0.33 {
            VolumeTier::Low
        } else if volume < 0.66 {
            VolumeTier::Medium
        } else {
            VolumeTier::High
        }
    }
}

/// Which way to advance through the playback order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Select the track at the given index, keeping the current play/pause
    /// state (switching while playing keeps playing).
    Load(usize),
    /// Select the track at the given index and start playing it.
    Play(usize),
    /// Toggle pause/resume; retries a failed start when a track is loaded.
    TogglePause,
    /// Skip to the next track in the playback order (always wraps).
    Next,
    /// Go to the previous track in the playback order (always wraps).
    Prev,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Seek to a fractional position in [0, 1]. No-op when the duration of
    /// the current track is unknown.
    SeekTo(f64),
    /// Set the volume; clamped to [0, 1].
    SetVolume(f32),
    ToggleMute,
    /// Advance through [`PLAYBACK_RATES`], wrapping.
    CycleRate,
    ToggleShuffle,
    /// Cycle repeat None -> All -> One -> None.
    CycleRepeat,
    /// Quit the audio thread.
    Quit,
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Currently loaded track index, if any.
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Duration of the current track, when the container declared one.
    pub duration: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    pub volume: f32,
    pub muted: bool,
    pub rate: f32,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            duration: None,
            playing: false,
            volume: 1.0,
            muted: false,
            rate: 1.0,
            shuffle: false,
            repeat: RepeatMode::default(),
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
