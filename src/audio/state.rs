//! The pure playback state machine.
//!
//! `PlayerState` owns the current track index, the playback order, repeat
//! and shuffle flags, volume/mute and the playback rate. It does no I/O and
//! touches no audio device, so every transition is unit-testable; the audio
//! thread consults it and drives the sink from its answers.

use rand::Rng;
use rand::seq::SliceRandom;

use super::types::{Direction, PLAYBACK_RATES, RepeatMode, VolumeTier};

/// What the audio thread should do after the current track ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackEndAction {
    /// Restart the given track from position zero.
    Restart(usize),
    /// Start playing the given track.
    Play(usize),
    /// Go idle.
    Stop,
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    len: usize,
    /// Currently loaded track, `None` when idle.
    pub current: Option<usize>,
    pub playing: bool,
    pub repeat: RepeatMode,
    pub shuffle: bool,
    /// Playback order: a permutation of `0..len`. The identity sequence when
    /// shuffle is off.
    order: Vec<usize>,
    volume: f32,
    pub muted: bool,
    rate_idx: usize,
}

impl PlayerState {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current: None,
            playing: false,
            repeat: RepeatMode::default(),
            shuffle: false,
            order: (0..len).collect(),
            volume: 1.0,
            muted: false,
            // Index of 1.0 in PLAYBACK_RATES.
            rate_idx: 1,
        }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Select the track at `index`. Out-of-range indices are ignored.
    pub fn load(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// Go idle: no track loaded, nothing playing.
    pub fn stop(&mut self) {
        self.current = None;
        self.playing = false;
    }

    /// Step to the next/previous track in the playback order, wrapping
    /// circularly. Returns the new index, or `None` on an empty playlist.
    pub fn advance(&mut self, dir: Direction) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }

        let next = match self.current {
            // From idle, Next starts at the head of the order and Previous
            // at its tail.
            None => match dir {
                Direction::Next => self.order[0],
                Direction::Previous => self.order[self.order.len() - 1],
            },
            Some(cur) => {
                let pos = self.order.iter().position(|&i| i == cur).unwrap_or(0);
                let len = self.order.len();
                let new_pos = match dir {
                    Direction::Next => (pos + 1) % len,
                    Direction::Previous => (pos + len - 1) % len,
                };
                self.order[new_pos]
            }
        };

        self.current = Some(next);
        Some(next)
    }

    /// Decide what to do when the current track finishes on its own.
    ///
    /// Repeat One restarts in place; All advances with wraparound; None
    /// advances until the end of the playback order and then stops.
    pub fn on_track_end(&mut self) -> TrackEndAction {
        let Some(cur) = self.current else {
            self.playing = false;
            return TrackEndAction::Stop;
        };

        match self.repeat {
            RepeatMode::One => TrackEndAction::Restart(cur),
            RepeatMode::All => match self.advance(Direction::Next) {
                Some(i) => TrackEndAction::Play(i),
                None => {
                    self.playing = false;
                    TrackEndAction::Stop
                }
            },
            RepeatMode::None => {
                let pos = self.order.iter().position(|&i| i == cur).unwrap_or(0);
                if pos + 1 >= self.order.len() {
                    self.stop();
                    return TrackEndAction::Stop;
                }
                match self.advance(Direction::Next) {
                    Some(i) => TrackEndAction::Play(i),
                    None => {
                        self.playing = false;
                        TrackEndAction::Stop
                    }
                }
            }
        }
    }

    /// Flip shuffle and regenerate the playback order.
    pub fn toggle_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.shuffle = !self.shuffle;
        self.regenerate_order(rng);
    }

    /// Rebuild `order`: the identity sequence, shuffled when shuffle is on.
    /// The active track is moved to the front so toggling shuffle never
    /// causes an immediate jump.
    fn regenerate_order<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order = (0..self.len).collect();
        if !self.shuffle {
            return;
        }

        self.order.shuffle(rng);
        if let Some(cur) = self.current {
            if let Some(pos) = self.order.iter().position(|&i| i == cur) {
                if pos > 0 {
                    self.order.remove(pos);
                    self.order.insert(0, cur);
                }
            }
        }
    }

    pub fn cycle_repeat(&mut self) {
        self.repeat = match self.repeat {
            RepeatMode::None => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::None,
        };
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume, clamped to [0, 1]. Non-finite input is ignored.
    pub fn set_volume(&mut self, v: f32) {
        if !v.is_finite() {
            return;
        }
        self.volume = v.clamp(0.0, 1.0);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// The volume actually applied to the sink: zero while muted.
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn volume_tier(&self) -> VolumeTier {
        VolumeTier::for_level(self.muted, self.volume)
    }

    pub fn rate(&self) -> f32 {
        PLAYBACK_RATES[self.rate_idx]
    }

    /// Step to the next playback rate, wrapping. Returns the new rate.
    pub fn cycle_rate(&mut self) -> f32 {
        self.rate_idx = (self.rate_idx + 1) % PLAYBACK_RATES.len();
        self.rate()
    }
}
