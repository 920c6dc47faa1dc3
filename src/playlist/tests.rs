use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use super::*;

#[test]
fn load_parses_name_and_url_entries() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("tracks.json");
    fs::write(
        &list,
        r#"[
            {"name": "Alpha", "url": "alpha.mp3"},
            {"name": "Beta", "url": "https://cdn.example/beta.mp3"}
        ]"#,
    )
    .unwrap();

    let tracks = load(list.to_str().unwrap()).unwrap();
    assert_eq!(tracks.len(), 2);

    assert_eq!(tracks[0].id, 0);
    assert_eq!(tracks[0].name, "Alpha");
    assert_eq!(tracks[0].source, Source::Path(dir.path().join("alpha.mp3")));

    assert_eq!(tracks[1].id, 1);
    assert_eq!(
        tracks[1].source,
        Source::Url("https://cdn.example/beta.mp3".to_string())
    );
    assert!(tracks[1].source.is_remote());
}

#[test]
fn load_accepts_display_and_file_aliases() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("tracks.json");
    fs::write(&list, r#"[{"display": "Gamma", "file": "sub/gamma.ogg"}]"#).unwrap();

    let tracks = load(list.to_str().unwrap()).unwrap();
    assert_eq!(tracks[0].name, "Gamma");
    assert_eq!(
        tracks[0].source,
        Source::Path(dir.path().join("sub/gamma.ogg"))
    );
}

#[test]
fn load_falls_back_to_file_stem_when_name_missing() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("tracks.json");
    fs::write(&list, r#"[{"url": "https://cdn.example/songs/delta.flac"}]"#).unwrap();

    let tracks = load(list.to_str().unwrap()).unwrap();
    assert_eq!(tracks[0].name, "delta");
}

#[test]
fn load_keeps_absolute_paths() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("tracks.json");
    fs::write(&list, r#"[{"name": "Abs", "url": "/music/abs.wav"}]"#).unwrap();

    let tracks = load(list.to_str().unwrap()).unwrap();
    assert_eq!(tracks[0].source, Source::Path(PathBuf::from("/music/abs.wav")));
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("tracks.json");
    fs::write(&list, "{ not json ]").unwrap();

    match load(list.to_str().unwrap()) {
        Err(PlaylistError::Parse(_)) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn load_reports_missing_file_as_io_error() {
    match load("/definitely/not/here/tracks.json") {
        Err(PlaylistError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn display_title_falls_back_to_name() {
    let mut t = Track::new(0, Source::Path(PathBuf::from("/x.mp3")), "File Name".into());
    assert_eq!(t.display_title(), "File Name");

    t.title = Some("Tagged Title".into());
    assert_eq!(t.display_title(), "Tagged Title");

    t.title = Some("   ".into());
    assert_eq!(t.display_title(), "File Name");
}

#[test]
fn display_artist_falls_back_to_default() {
    let mut t = Track::new(0, Source::Path(PathBuf::from("/x.mp3")), "X".into());
    assert_eq!(t.display_artist(), DEFAULT_ARTIST);

    t.artist = Some("Someone".into());
    assert_eq!(t.display_artist(), "Someone");
}

#[test]
fn locator_is_stable_per_source() {
    let url = Source::Url("https://cdn.example/a.mp3".into());
    assert_eq!(url.locator(), "https://cdn.example/a.mp3");

    let path = Source::Path(PathBuf::from("/music/a.mp3"));
    assert_eq!(path.locator(), "/music/a.mp3");
    assert_eq!(path.locator(), path.locator());
}
