//! Media resolution and `rodio` sink plumbing for the audio thread.
//!
//! Local tracks decode straight from the file; remote tracks are fetched
//! fully into memory and decoded from the buffer. The buffer is kept for the
//! lifetime of the track so seeking rebuilds the decoder without refetching.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use thiserror::Error;

use crate::playlist::Source as TrackSource;

/// Why a playback start (or seek rebuild) failed. Always recovered: the
/// thread logs it and stays paused.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("failed to open media: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch media: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("failed to decode media: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Resolved media for the current track.
pub(super) enum Media {
    File(PathBuf),
    Memory(Arc<[u8]>),
}

impl Media {
    /// Resolve a track source, returning the media plus its tag-declared
    /// duration when one could be probed.
    pub(super) fn open(
        source: &TrackSource,
        client: &reqwest::blocking::Client,
    ) -> Result<(Media, Option<Duration>), PlaybackError> {
        match source {
            TrackSource::Path(p) => {
                // Probe duration up front; the decoder itself often cannot
                // report a total duration for compressed formats.
                let duration = probe_duration_path(p);
                // Fail now if the file is unreadable rather than at append time.
                File::open(p)?;
                Ok((Media::File(p.clone()), duration))
            }
            TrackSource::Url(u) => {
                let bytes = client.get(u).send()?.error_for_status()?.bytes()?.to_vec();
                let duration = probe_duration_bytes(&bytes);
                Ok((Media::Memory(bytes.into()), duration))
            }
        }
    }

    fn append_to(&self, sink: &Sink, start_at: Duration) -> Result<(), PlaybackError> {
        match self {
            Media::File(p) => {
                let file = File::open(p)?;
                let source = Decoder::new(BufReader::new(file))?.skip_duration(start_at);
                sink.append(source);
            }
            Media::Memory(bytes) => {
                let source = Decoder::new(Cursor::new(bytes.clone()))?.skip_duration(start_at);
                sink.append(source);
            }
        }
        Ok(())
    }
}

fn probe_duration_path(path: &std::path::Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|t| t.properties().duration())
}

fn probe_duration_bytes(bytes: &[u8]) -> Option<Duration> {
    Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .ok()?
        .read()
        .ok()
        .map(|t| t.properties().duration())
}

/// The audio-thread side of the transport: output stream, current sink and
/// media, and elapsed-time accounting that honors the playback rate.
pub(super) struct Engine {
    stream: OutputStream,
    client: reqwest::blocking::Client,
    sink: Option<Sink>,
    media: Option<Media>,
    pub(super) duration: Option<Duration>,
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Engine {
    pub(super) fn new() -> Self {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped; noisy for a TUI.
        stream.log_on_drop(false);

        Self {
            stream,
            client: reqwest::blocking::Client::new(),
            sink: None,
            media: None,
            duration: None,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    pub(super) fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// True when the current sink ran out of audio on its own.
    pub(super) fn finished(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| s.empty())
    }

    /// Elapsed playback time of the current track, scaled by `rate`.
    pub(super) fn elapsed(&self, rate: f32) -> Duration {
        let running = self
            .started_at
            .map(|st| st.elapsed().mul_f32(rate))
            .unwrap_or(Duration::ZERO);
        self.accumulated + running
    }

    /// Switch to `source`. The previous sink is stopped and dropped, along
    /// with its media buffer, before the new source is touched.
    pub(super) fn load(
        &mut self,
        source: &TrackSource,
        play: bool,
        volume: f32,
        rate: f32,
    ) -> Result<(), PlaybackError> {
        self.stop();

        let (media, duration) = Media::open(source, &self.client)?;
        self.duration = duration;
        self.start_sink(&media, Duration::ZERO, play, volume, rate)?;
        self.media = Some(media);
        Ok(())
    }

    /// Rebuild the decoder at `target`. No-op when no media is loaded.
    pub(super) fn seek(
        &mut self,
        target: Duration,
        play: bool,
        volume: f32,
        rate: f32,
    ) -> Result<(), PlaybackError> {
        let Some(media) = self.media.take() else {
            return Ok(());
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        let result = self.start_sink(&media, target, play, volume, rate);
        self.media = Some(media);
        result
    }

    fn start_sink(
        &mut self,
        media: &Media,
        start_at: Duration,
        play: bool,
        volume: f32,
        rate: f32,
    ) -> Result<(), PlaybackError> {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        media.append_to(&sink, start_at)?;
        sink.set_volume(volume);
        sink.set_speed(rate);

        self.accumulated = start_at;
        if play {
            sink.play();
            self.started_at = Some(Instant::now());
        } else {
            self.started_at = None;
        }
        self.sink = Some(sink);
        Ok(())
    }

    pub(super) fn pause(&mut self, rate: f32) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.accumulated = self.elapsed(rate);
        self.started_at = None;
    }

    pub(super) fn resume(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn set_volume(&self, volume: f32) {
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    /// Change the playback rate, folding elapsed time accumulated at the old
    /// rate first so the progress clock stays honest.
    pub(super) fn set_rate(&mut self, old_rate: f32, new_rate: f32, playing: bool) {
        self.accumulated = self.elapsed(old_rate);
        self.started_at = if playing { Some(Instant::now()) } else { None };
        if let Some(s) = self.sink.as_ref() {
            s.set_speed(new_rate);
        }
    }

    /// Stop and release the current sink, media buffer and clock.
    pub(super) fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.media = None;
        self.duration = None;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }
}
