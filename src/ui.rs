//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, ArtStatus};
use crate::audio::{PlaybackInfo, RepeatMode, VolumeTier};
use crate::config::{ControlsSettings, Theme, UiSettings};

/// Colors derived from the persisted theme.
struct Palette {
    accent: Color,
    dim: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            accent: Color::Blue,
            dim: Color::Gray,
        },
        Theme::Dark => Palette {
            accent: Color::Cyan,
            dim: Color::DarkGray,
        },
    }
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Deterministic fallback-thumbnail hue: char-code sum mod 360.
fn thumb_hue(name: &str) -> u32 {
    name.chars().map(|c| c as u32).sum::<u32>() % 360
}

/// HSL (h in degrees, s/l in [0,1]) to RGB bytes.
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp.floor() as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Background color for a track's letter thumbnail (HSL 70%/55%, like the
/// fallback thumbnails this player's track lists were designed around).
fn thumb_color(name: &str) -> Color {
    let (r, g, b) = hsl_to_rgb(thumb_hue(name) as f32, 0.70, 0.55);
    Color::Rgb(r, g, b)
}

fn volume_glyph(tier: VolumeTier) -> &'static str {
    match tier {
        VolumeTier::Muted => "muted",
        VolumeTier::Low => "vol ▁",
        VolumeTier::Medium => "vol ▄",
        VolumeTier::High => "vol █",
    }
}

fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::None => "repeat off",
        RepeatMode::One => "repeat one",
        RepeatMode::All => "repeat all",
    }
}

fn controls_text(controls: &ControlsSettings) -> String {
    format!(
        "[space] play/pause | [enter] play selected | [←/→] seek -/+{}s | [^n/^p] next/prev | \
         [s] shuffle | [r] repeat | [m] mute | [+/-] volume | [x] rate | [/] filter | [t] theme | \
         [i] info | [q] quit",
        controls.seek_seconds
    )
}

fn placeholder(frame: &mut Frame, area: Rect, pal: &Palette, msg: &str) {
    let par = Paragraph::new(msg)
        .style(Style::default().fg(pal.dim))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .wrap(Wrap { trim: true });
    frame.render_widget(par, area);
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame` using `app` state.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let pal = palette(app.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(pal.accent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let info = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|i| i.clone()))
        .unwrap_or_default();

    draw_now_playing(frame, chunks[1], app, &pal, &info);
    draw_track_list(frame, chunks[2], app, display, &pal, &info);

    if app.info_window {
        draw_info_popup(frame, chunks[2], app);
    }

    let footer = Paragraph::new(controls_text(controls_settings))
        .style(Style::default().fg(pal.dim))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_now_playing(frame: &mut Frame, area: Rect, app: &App, pal: &Palette, info: &PlaybackInfo) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" now playing ")
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Track line
    let title_line = match info.index.and_then(|i| app.tracks.get(i)) {
        Some(track) => Line::from(vec![
            Span::styled(
                track.display_title().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(
                track.display_artist().to_string(),
                Style::default().fg(pal.dim),
            ),
        ]),
        None => Line::from(Span::styled(
            "Nothing playing",
            Style::default().fg(pal.dim),
        )),
    };
    frame.render_widget(Paragraph::new(title_line), rows[0]);

    // Progress gauge
    let (ratio, label) = match info.duration {
        Some(total) if total > Duration::ZERO => {
            let ratio = (info.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0);
            (
                ratio,
                format!("{} / {}", format_mmss(info.elapsed), format_mmss(total)),
            )
        }
        _ => (0.0, format!("{} / --:--", format_mmss(info.elapsed))),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(pal.accent))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, rows[1]);

    // Transport flags
    let state = if info.index.is_none() {
        "stopped"
    } else if info.playing {
        "playing"
    } else {
        "paused"
    };
    let tier = VolumeTier::for_level(info.muted, info.volume);
    let mut flags = vec![
        state.to_string(),
        if info.shuffle {
            "shuffle on".to_string()
        } else {
            "shuffle off".to_string()
        },
        repeat_label(info.repeat).to_string(),
        format!("{} {:.0}%", volume_glyph(tier), info.volume * 100.0),
        format!("{:.2}x", info.rate),
    ];
    if app.filter_mode || !app.filter_query.is_empty() {
        flags.push(format!("filter: {}", app.filter_query));
    }
    let flags_par = Paragraph::new(flags.join(" • ")).style(Style::default().fg(pal.dim));
    frame.render_widget(flags_par, rows[2]);
}

fn draw_track_list(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    display: &[usize],
    pal: &Palette,
    info: &PlaybackInfo,
) {
    if let Some(msg) = &app.load_error {
        placeholder(frame, area, pal, msg);
        return;
    }
    if app.tracks.is_empty() {
        placeholder(frame, area, pal, "No tracks found in the track list");
        return;
    }
    if display.is_empty() {
        placeholder(frame, area, pal, "No matching tracks");
        return;
    }

    // Center the selected item when possible by windowing the visible slice;
    // only visible rows become ListItems.
    let total = display.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = display
        .iter()
        .position(|&i| i == app.selected)
        .unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let active = info.index;
    let visible_items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.tracks[i];
            let letter = track
                .name
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_else(|| "?".to_string());

            // Letter block colored by the name hash; a note marker replaces
            // it once real album art was extracted.
            let thumb = match app.art.get(i) {
                Some(ArtStatus::Found(_)) => Span::styled(
                    " ♪ ",
                    Style::default().fg(Color::Black).bg(thumb_color(&track.name)),
                ),
                _ => Span::styled(
                    format!(" {letter} "),
                    Style::default().fg(Color::Black).bg(thumb_color(&track.name)),
                ),
            };

            let is_active = active == Some(i);
            let marker = if is_active { "▶ " } else { "  " };
            let name_style = if is_active {
                Style::default()
                    .fg(pal.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(marker.to_string(), Style::default().fg(pal.accent)),
                thumb,
                Span::raw(" "),
                Span::styled(track.name.clone(), name_style),
            ]))
        })
        .collect();

    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_info_popup(frame: &mut Frame, list_area: Rect, app: &App) {
    let popup_area = centered_rect_sized(72, 9, list_area);
    frame.render_widget(Clear, popup_area);

    let meta = match app.tracks.get(app.selected) {
        Some(track) => {
            let duration = track
                .duration
                .map(format_mmss)
                .unwrap_or_else(|| "-".to_string());
            let art = match app.art.get(app.selected) {
                Some(ArtStatus::Found(a)) => {
                    format!("{} ({:.1} KB)", a.mime, a.data.len() as f64 / 1024.0)
                }
                Some(ArtStatus::Missing) => "none".to_string(),
                _ => "loading…".to_string(),
            };
            let kind = if track.source.is_remote() {
                "remote"
            } else {
                "local"
            };
            format!(
                "Title: {}\nArtist: {}\nDuration: {}\nArtwork: {}\nSource: {} ({kind})",
                track.display_title(),
                track.display_artist(),
                duration,
                art,
                track.source.locator(),
            )
        }
        None => "No track selected".to_string(),
    };

    let popup = Paragraph::new(meta)
        .block(
            Block::default()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .borders(Borders::ALL)
                .title(" track info (i closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumb_hue_is_char_code_sum_mod_360() {
        // 'a' + 'b' + 'c' = 97 + 98 + 99 = 294
        assert_eq!(thumb_hue("abc"), 294);
        assert_eq!(thumb_hue("abc"), thumb_hue("abc"));
        assert_eq!(thumb_hue(""), 0);
    }

    #[test]
    fn hsl_to_rgb_handles_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), (255, 255, 255));
    }

    #[test]
    fn format_mmss_pads_seconds() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
        assert_eq!(format_mmss(Duration::from_secs(600)), "10:00");
    }
}
