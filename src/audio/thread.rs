use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rand::thread_rng;
use tracing::warn;

use crate::config::{PlaybackSettings, RepeatSetting};
use crate::playlist::Track;

use super::sink::Engine;
use super::state::{PlayerState, TrackEndAction};
use super::types::{AudioCmd, Direction, PlaybackHandle, RepeatMode};

pub(super) fn spawn_audio_thread(
    tracks: Vec<Track>,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    defaults: PlaybackSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut engine = Engine::new();
        let mut state = PlayerState::new(tracks.len());

        state.set_repeat(match defaults.repeat {
            RepeatSetting::None => RepeatMode::None,
            RepeatSetting::One => RepeatMode::One,
            RepeatSetting::All => RepeatMode::All,
        });
        state.set_volume(defaults.volume);
        if defaults.shuffle {
            state.toggle_shuffle(&mut thread_rng());
        }

        publish(&playback_info, &state, &engine);

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(i) => {
                        if state.load(i) {
                            // Keep the play/pause state the caller had.
                            let keep_playing = state.playing;
                            start(&mut engine, &mut state, &tracks, i, keep_playing);
                        }
                    }

                    AudioCmd::Play(i) => {
                        if state.load(i) {
                            start(&mut engine, &mut state, &tracks, i, true);
                        }
                    }

                    AudioCmd::TogglePause => {
                        if engine.has_sink() {
                            if state.playing {
                                engine.pause(state.rate());
                                state.playing = false;
                            } else {
                                engine.resume();
                                state.playing = true;
                            }
                        } else if let Some(i) = state.current {
                            // A previous start failed; the same control retries.
                            start(&mut engine, &mut state, &tracks, i, true);
                        }
                    }

                    AudioCmd::Next => {
                        if let Some(i) = state.advance(Direction::Next) {
                            start(&mut engine, &mut state, &tracks, i, true);
                        }
                    }

                    AudioCmd::Prev => {
                        if let Some(i) = state.advance(Direction::Previous) {
                            start(&mut engine, &mut state, &tracks, i, true);
                        }
                    }

                    AudioCmd::SeekBy(secs) => {
                        if engine.has_sink() {
                            let cur = engine.elapsed(state.rate());
                            let step = Duration::from_secs(u64::from(secs.unsigned_abs()));
                            let target = if secs >= 0 {
                                cur + step
                            } else {
                                cur.saturating_sub(step)
                            };
                            seek(&mut engine, &mut state, target);
                        }
                    }

                    AudioCmd::SeekTo(frac) => {
                        // Unknown duration makes a fractional seek meaningless.
                        if engine.has_sink() {
                            if let Some(dur) = engine.duration {
                                let frac = if frac.is_finite() {
                                    frac.clamp(0.0, 1.0)
                                } else {
                                    0.0
                                };
                                seek(&mut engine, &mut state, dur.mul_f64(frac));
                            }
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        state.set_volume(v);
                        engine.set_volume(state.effective_volume());
                    }

                    AudioCmd::ToggleMute => {
                        state.toggle_mute();
                        engine.set_volume(state.effective_volume());
                    }

                    AudioCmd::CycleRate => {
                        let old = state.rate();
                        let new = state.cycle_rate();
                        engine.set_rate(old, new, state.playing);
                    }

                    AudioCmd::ToggleShuffle => {
                        state.toggle_shuffle(&mut thread_rng());
                    }

                    AudioCmd::CycleRepeat => {
                        state.cycle_repeat();
                    }

                    AudioCmd::Quit => {
                        engine.stop();
                        break;
                    }
                },

                Err(RecvTimeoutError::Timeout) => {
                    // Periodic check for end-of-track auto-advance.
                    if state.playing && engine.finished() {
                        match state.on_track_end() {
                            TrackEndAction::Restart(i) | TrackEndAction::Play(i) => {
                                start(&mut engine, &mut state, &tracks, i, true);
                            }
                            TrackEndAction::Stop => engine.stop(),
                        }
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }

            publish(&playback_info, &state, &engine);
        }

        // Leave a quiescent snapshot behind for the UI teardown path.
        if let Ok(mut info) = playback_info.lock() {
            info.playing = false;
        }
    })
}

/// Start (or restart) the track at `index`. A start failure is logged and
/// leaves the state not playing; a later `TogglePause` retries.
fn start(engine: &mut Engine, state: &mut PlayerState, tracks: &[Track], index: usize, play: bool) {
    let track = &tracks[index];
    match engine.load(&track.source, play, state.effective_volume(), state.rate()) {
        Ok(()) => state.playing = play,
        Err(err) => {
            warn!(track = %track.name, %err, "failed to start playback");
            engine.stop();
            state.playing = false;
        }
    }
}

fn seek(engine: &mut Engine, state: &mut PlayerState, target: Duration) {
    if let Err(err) = engine.seek(target, state.playing, state.effective_volume(), state.rate()) {
        warn!(%err, "seek failed");
        engine.stop();
        state.playing = false;
    }
}

fn publish(handle: &PlaybackHandle, state: &PlayerState, engine: &Engine) {
    if let Ok(mut info) = handle.lock() {
        info.index = state.current;
        info.elapsed = engine.elapsed(state.rate());
        info.duration = engine.duration;
        info.playing = state.playing;
        info.volume = state.volume();
        info.muted = state.muted;
        info.rate = state.rate();
        info.shuffle = state.shuffle;
        info.repeat = state.repeat;
    }
}
