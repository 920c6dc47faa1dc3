use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lofty::picture::PictureType;
use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use thiserror::Error;
use tracing::debug;

use crate::playlist::Source;

/// Embedded picture pulled out of a tag container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub mime: String,
    pub data: Vec<u8>,
}

impl Artwork {
    /// Encode as a `data:` URI, the form consumed by image-capable surfaces.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

/// Everything the extractor can learn about one track.
#[derive(Debug, Clone, Default)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
    pub artwork: Option<Artwork>,
}

/// Internal failure taxonomy; never escapes [`MetadataExtractor::extract`].
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read media: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch media: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to parse tag container: {0}")]
    Parse(#[from] lofty::error::LoftyError),
    #[error("metadata fetch timed out")]
    Timeout,
}

/// Fetches and parses tag metadata, caching results per locator.
///
/// The cache holds the `None` sentinel too: once a track failed to yield
/// metadata, later lookups return that answer without another fetch.
pub struct MetadataExtractor {
    client: reqwest::Client,
    timeout: Duration,
    cache: Mutex<HashMap<String, Option<TrackMetadata>>>,
}

impl MetadataExtractor {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                debug!(%err, "failed to build HTTP client with timeout, using default");
                reqwest::Client::new()
            });

        Self {
            client,
            timeout,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Extract metadata for `source`. Never fails: any error degrades to
    /// `None`, which is cached like a successful result.
    pub async fn extract(&self, source: &Source) -> Option<TrackMetadata> {
        let key = source.locator();

        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return cached.clone();
            }
        }

        let result = match self.extract_uncached(source).await {
            Ok(meta) => Some(meta),
            Err(err) => {
                debug!(locator = %key, %err, "metadata extraction failed");
                None
            }
        };

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, result.clone());
        }
        result
    }

    async fn extract_uncached(&self, source: &Source) -> Result<TrackMetadata, MetadataError> {
        let bytes = match source {
            Source::Path(p) => tokio::time::timeout(self.timeout, tokio::fs::read(p))
                .await
                .map_err(|_| MetadataError::Timeout)??,
            // The async client carries its own timeout.
            Source::Url(u) => self
                .client
                .get(u)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec(),
        };

        parse_tagged_bytes(&bytes)
    }
}

/// Parse an in-memory media buffer for tag fields and a picture frame.
pub(super) fn parse_tagged_bytes(bytes: &[u8]) -> Result<TrackMetadata, MetadataError> {
    let tagged = Probe::new(Cursor::new(bytes)).guess_file_type()?.read()?;

    let mut meta = TrackMetadata {
        duration: Some(tagged.properties().duration()),
        ..TrackMetadata::default()
    };

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return Ok(meta);
    };

    meta.title = tag
        .title()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    meta.artist = tag
        .artist()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    // Prefer the front cover, otherwise take whatever picture comes first.
    let pictures = tag.pictures();
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first());

    if let Some(picture) = picture {
        let mime = picture
            .mime_type()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());
        meta.artwork = Some(Artwork {
            mime,
            data: picture.data().to_vec(),
        });
    }

    Ok(meta)
}
