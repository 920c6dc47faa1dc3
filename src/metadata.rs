//! Metadata extraction: embedded tags and album art, fetched lazily.
//!
//! Extraction is best-effort by contract: callers only ever see
//! `Option<TrackMetadata>`. Failures are logged and cached as the `None`
//! sentinel so a bad track is not re-fetched on every lookup.

mod extractor;
mod prefetch;

pub use extractor::*;
pub use prefetch::*;

#[cfg(test)]
mod tests;
