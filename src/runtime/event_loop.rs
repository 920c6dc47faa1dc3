use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::metadata::MetadataEvent;
use crate::ui;

/// Main terminal event loop: drains metadata events, syncs playback state
/// from the audio thread, draws and dispatches input. Returns `Ok(())` when
/// shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &AudioPlayer,
    meta_rx: &mpsc::Receiver<MetadataEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Thumbnails/tags arriving from the prefetch thread.
        while let Ok(event) = meta_rx.try_recv() {
            app.apply_metadata(event);
        }

        // Mirror the audio thread's snapshot into the app model.
        // Clone the Arc handle to avoid borrowing `app` across the mutation.
        if let Some(handle) = app.playback_handle.clone() {
            if let Ok(info) = handle.lock() {
                app.playback = if info.index.is_none() {
                    PlaybackState::Stopped
                } else if info.playing {
                    PlaybackState::Playing
                } else {
                    PlaybackState::Paused
                };
            }
        }

        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player) {
                    player.shutdown();
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Handle one key press. Returns `true` to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &AudioPlayer,
) -> bool {
    // While the filter input is focused, printable keys edit the query and
    // the transport shortcuts are suppressed.
    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Up => app.select_prev(),
            KeyCode::Down => app.select_next(),
            KeyCode::Enter => {
                if !app.display_indices().is_empty() {
                    app.exit_filter_mode();
                    let _ = player.send(AudioCmd::Play(app.selected));
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
            _ => {}
        }
        return false;
    }

    let seek = settings.controls.seek_seconds.min(i32::MAX as u64) as i32;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return true,

        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let _ = player.send(AudioCmd::Next);
        }
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let _ = player.send(AudioCmd::Prev);
        }

        KeyCode::Char(' ') => {
            // From a cold start play the selection; otherwise toggle.
            match app.playback {
                PlaybackState::Stopped => {
                    if app.has_tracks() {
                        let _ = player.send(AudioCmd::Play(app.selected));
                    }
                }
                _ => {
                    let _ = player.send(AudioCmd::TogglePause);
                }
            }
        }

        KeyCode::Enter => {
            if app.has_tracks() {
                let _ = player.send(AudioCmd::Play(app.selected));
            }
        }

        KeyCode::Left => {
            let _ = player.send(AudioCmd::SeekBy(-seek));
        }
        KeyCode::Right => {
            let _ = player.send(AudioCmd::SeekBy(seek));
        }

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('g') => app.select_first(),
        KeyCode::Char('G') => app.select_last(),

        KeyCode::Char('h') => {
            let _ = player.send(AudioCmd::Prev);
        }
        KeyCode::Char('l') => {
            let _ = player.send(AudioCmd::Next);
        }

        KeyCode::Char('s') => {
            let _ = player.send(AudioCmd::ToggleShuffle);
        }
        KeyCode::Char('r') => {
            let _ = player.send(AudioCmd::CycleRepeat);
        }
        KeyCode::Char('m') => {
            let _ = player.send(AudioCmd::ToggleMute);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let _ = player.send(AudioCmd::SetVolume(current_volume(app) + step));
        }
        KeyCode::Char('-') => {
            let _ = player.send(AudioCmd::SetVolume(current_volume(app) - step));
        }
        KeyCode::Char('x') => {
            let _ = player.send(AudioCmd::CycleRate);
        }

        // Percent seek: 1 = 10% into the track, 9 = 90%, 0 = the start.
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let tenth = c.to_digit(10).unwrap_or(0) as f64 / 10.0;
            let _ = player.send(AudioCmd::SeekTo(tenth));
        }

        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Esc => {
            if app.info_window {
                app.info_window = false;
            } else {
                app.clear_filter();
            }
        }

        KeyCode::Char('t') => {
            app.toggle_theme();
            config::save_theme(app.theme);
        }
        KeyCode::Char('i') => app.toggle_info_window(),

        _ => {}
    }

    false
}

/// Last volume published by the audio thread. All mutation flows through
/// that thread, so read-modify-write from here cannot race.
fn current_volume(app: &App) -> f32 {
    app.playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|info| info.volume))
        .unwrap_or(1.0)
}
