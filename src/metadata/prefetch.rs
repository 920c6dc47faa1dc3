use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::NetworkSettings;
use crate::playlist::Track;

use super::extractor::{MetadataExtractor, TrackMetadata};

/// Result of one track's extraction attempt, streamed to the event loop.
#[derive(Debug)]
pub struct MetadataEvent {
    pub index: usize,
    /// `None` means "checked, nothing usable", distinct from not-yet-checked.
    pub metadata: Option<TrackMetadata>,
}

/// Spawn the background prefetch thread.
///
/// Tracks are processed in batches of `network.concurrency` (default 5);
/// each batch is awaited before the next one starts, so a long playlist
/// never floods the network with simultaneous fetches.
pub fn spawn_prefetch(
    tracks: Vec<Track>,
    network: NetworkSettings,
    tx: Sender<MetadataEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                warn!(%err, "failed to build metadata runtime; thumbnails disabled");
                return;
            }
        };

        rt.block_on(prefetch_all(tracks, network, tx));
    })
}

async fn prefetch_all(tracks: Vec<Track>, network: NetworkSettings, tx: Sender<MetadataEvent>) {
    let extractor = Arc::new(MetadataExtractor::new(Duration::from_secs(
        network.timeout_secs.max(1),
    )));
    let concurrency = network.concurrency.max(1);

    let indices: Vec<usize> = (0..tracks.len()).collect();
    for batch in indices.chunks(concurrency) {
        let mut set = JoinSet::new();
        for &index in batch {
            let extractor = extractor.clone();
            let source = tracks[index].source.clone();
            set.spawn(async move {
                MetadataEvent {
                    index,
                    metadata: extractor.extract(&source).await,
                }
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                // Receiver gone means the app is shutting down.
                Ok(event) => {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                Err(err) => debug!(%err, "metadata task panicked"),
            }
        }
    }
}
