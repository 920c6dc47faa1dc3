use std::path::PathBuf;

use super::*;
use crate::config::Theme;
use crate::metadata::{Artwork, MetadataEvent, TrackMetadata};
use crate::playlist::{Source, Track};

fn t(id: usize, name: &str) -> Track {
    Track::new(id, Source::Path(PathBuf::from(format!("/{name}.mp3"))), name.into())
}

fn app(names: &[&str]) -> App {
    let tracks = names
        .iter()
        .enumerate()
        .map(|(i, &n)| t(i, n))
        .collect();
    App::new(tracks, Theme::Light)
}

#[test]
fn display_indices_filter_is_case_insensitive_substring() {
    let mut app = app(&["Morning Rain", "Evening Calm", "Rainfall"]);

    app.filter_query = "rain".into();
    assert_eq!(app.display_indices(), vec![0, 2]);

    app.filter_query = "RAIN".into();
    assert_eq!(app.display_indices(), vec![0, 2]);

    app.filter_query = "xyz".into();
    assert!(app.display_indices().is_empty());

    app.filter_query.clear();
    assert_eq!(app.display_indices(), vec![0, 1, 2]);
}

#[test]
fn selection_wraps_within_the_filtered_view() {
    let mut app = app(&["Alpha", "Beta", "Albatross"]);
    app.filter_query = "al".into();
    // Visible: Alpha (0), Albatross (2).
    app.selected = 0;

    app.select_next();
    assert_eq!(app.selected, 2);
    app.select_next();
    assert_eq!(app.selected, 0);
    app.select_prev();
    assert_eq!(app.selected, 2);
}

#[test]
fn selection_moves_are_noops_on_an_empty_playlist() {
    let mut app = app(&[]);
    app.select_next();
    app.select_prev();
    assert_eq!(app.selected, 0);
}

#[test]
fn narrowing_the_filter_moves_a_hidden_selection() {
    let mut app = app(&["Alpha", "Beta", "Gamma"]);
    app.selected = 1;

    app.push_filter_char('a');
    // "a" matches all three; Beta stays selected.
    assert_eq!(app.selected, 1);

    app.push_filter_char('l');
    // "al" only matches Alpha.
    assert_eq!(app.selected, 0);
}

#[test]
fn apply_metadata_updates_fields_and_art_status() {
    let mut app = app(&["One", "Two"]);
    assert_eq!(app.art[0], ArtStatus::Pending);

    app.apply_metadata(MetadataEvent {
        index: 0,
        metadata: Some(TrackMetadata {
            title: Some("Real Title".into()),
            artist: None,
            duration: Some(std::time::Duration::from_secs(90)),
            artwork: Some(Artwork {
                mime: "image/png".into(),
                data: vec![1, 2],
            }),
        }),
    });

    assert_eq!(app.tracks[0].display_title(), "Real Title");
    // Artist stayed on its fallback.
    assert_eq!(app.tracks[0].display_artist(), crate::playlist::DEFAULT_ARTIST);
    assert_eq!(app.tracks[0].duration, Some(std::time::Duration::from_secs(90)));
    assert!(matches!(app.art[0], ArtStatus::Found(_)));
}

#[test]
fn failed_metadata_marks_art_missing_without_touching_fields() {
    let mut app = app(&["One"]);
    app.tracks[0].title = Some("Kept".into());

    app.apply_metadata(MetadataEvent {
        index: 0,
        metadata: None,
    });

    assert_eq!(app.art[0], ArtStatus::Missing);
    assert_eq!(app.tracks[0].display_title(), "Kept");
}

#[test]
fn metadata_for_unknown_index_is_ignored() {
    let mut app = app(&["One"]);
    app.apply_metadata(MetadataEvent {
        index: 9,
        metadata: None,
    });
    assert_eq!(app.art.len(), 1);
    assert_eq!(app.art[0], ArtStatus::Pending);
}

#[test]
fn clear_filter_restores_the_full_view() {
    let mut app = app(&["Alpha", "Beta"]);
    app.enter_filter_mode();
    app.push_filter_char('z');
    assert!(app.display_indices().is_empty());

    app.clear_filter();
    assert!(!app.filter_mode);
    assert_eq!(app.display_indices(), vec![0, 1]);
}
