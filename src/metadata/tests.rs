use std::fs;
use std::path::Path;

use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::{Accessor, TagExt};
use lofty::tag::{Tag, TagType};
use tempfile::tempdir;

use crate::playlist::Source;

use super::extractor::parse_tagged_bytes;
use super::*;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

/// Minimal mono 16-bit PCM WAV: enough container for lofty to probe and tag.
fn write_wav(path: &Path) {
    let samples = vec![0u8; 3200];
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36u32 + samples.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&8000u32.to_le_bytes());
    bytes.extend_from_slice(&16000u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&samples);
    fs::write(path, bytes).unwrap();
}

fn write_tagged_wav(path: &Path, with_art: bool) {
    write_wav(path);

    let mut tag = Tag::new(TagType::Id3v2);
    tag.set_title("Tagged Title".to_string());
    tag.set_artist("Tagged Artist".to_string());
    if with_art {
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Png),
            None,
            PNG_BYTES.to_vec(),
        ));
    }
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}

#[tokio::test]
async fn extract_reads_tags_and_artwork() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tagged.wav");
    write_tagged_wav(&path, true);

    let extractor = MetadataExtractor::new(std::time::Duration::from_secs(5));
    let meta = extractor
        .extract(&Source::Path(path))
        .await
        .expect("tagged file yields metadata");

    assert_eq!(meta.title.as_deref(), Some("Tagged Title"));
    assert_eq!(meta.artist.as_deref(), Some("Tagged Artist"));
    assert!(meta.duration.is_some());

    let art = meta.artwork.expect("picture frame extracted");
    assert_eq!(art.mime, "image/png");
    assert_eq!(art.data, PNG_BYTES);
}

#[tokio::test]
async fn extract_without_picture_yields_no_artwork() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plain.wav");
    write_tagged_wav(&path, false);

    let extractor = MetadataExtractor::new(std::time::Duration::from_secs(5));
    let meta = extractor.extract(&Source::Path(path)).await.unwrap();
    assert!(meta.artwork.is_none());
    assert_eq!(meta.title.as_deref(), Some("Tagged Title"));
}

#[tokio::test]
async fn extract_caches_results_and_skips_refetching() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cached.wav");
    write_tagged_wav(&path, true);
    let source = Source::Path(path.clone());

    let extractor = MetadataExtractor::new(std::time::Duration::from_secs(5));
    let first = extractor.extract(&source).await.unwrap();

    // If a second call re-fetched, the missing file would turn the result
    // into None; the cached value must come back instead.
    fs::remove_file(&path).unwrap();
    let second = extractor.extract(&source).await.unwrap();
    assert_eq!(second.title, first.title);
    assert_eq!(second.artwork, first.artwork);
}

#[tokio::test]
async fn extraction_failure_is_cached_as_the_none_sentinel() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("late.wav");
    let source = Source::Path(path.clone());

    let extractor = MetadataExtractor::new(std::time::Duration::from_secs(5));
    assert!(extractor.extract(&source).await.is_none());

    // The file appearing later must not change the cached answer.
    write_tagged_wav(&path, true);
    assert!(extractor.extract(&source).await.is_none());
}

#[tokio::test]
async fn unparseable_bytes_degrade_to_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.mp3");
    fs::write(&path, b"definitely not audio").unwrap();

    let extractor = MetadataExtractor::new(std::time::Duration::from_secs(5));
    assert!(extractor.extract(&Source::Path(path)).await.is_none());
}

#[test]
fn artwork_encodes_as_data_uri() {
    let art = Artwork {
        mime: "image/png".to_string(),
        data: b"abc".to_vec(),
    };
    assert_eq!(art.to_data_uri(), "data:image/png;base64,YWJj");
}

#[test]
fn parse_prefers_front_cover_over_other_pictures() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("covers.wav");
    write_wav(&path);

    let mut tag = Tag::new(TagType::Id3v2);
    tag.push_picture(Picture::new_unchecked(
        PictureType::Artist,
        Some(MimeType::Jpeg),
        None,
        vec![1, 1, 1],
    ));
    tag.push_picture(Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::Png),
        None,
        vec![2, 2, 2],
    ));
    tag.save_to_path(&path, WriteOptions::default()).unwrap();

    let meta = parse_tagged_bytes(&fs::read(&path).unwrap()).unwrap();
    let art = meta.artwork.unwrap();
    assert_eq!(art.mime, "image/png");
    assert_eq!(art.data, vec![2, 2, 2]);
}
