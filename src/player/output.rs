//! `rodio`-backed implementation of the output seam.
//!
//! The backend owns the OS output stream and opens one paused `Sink` per
//! track. The stream is opened lazily on the first load so a missing audio
//! device surfaces as a load failure instead of tearing the session down.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::catalog::Track;
use crate::error::AudioError;

use super::backend::{AudioBackend, AudioHandle};

pub struct RodioBackend {
    stream: Option<OutputStream>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self { stream: None }
    }

    fn stream(&mut self) -> Result<&OutputStream, AudioError> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| AudioError::Open(format!("no audio output device: {e}")))?;
            // rodio logs to stderr when OutputStream is dropped. That's useful in
            // debugging, but noisy for host applications.
            stream.log_on_drop(false);
            debug!("opened default audio output stream");
            self.stream = Some(stream);
        }
        match self.stream.as_ref() {
            Some(stream) => Ok(stream),
            None => Err(AudioError::Open("no audio output device".into())),
        }
    }
}

impl AudioBackend for RodioBackend {
    fn open(&mut self, track: &Track) -> Result<Box<dyn AudioHandle>, AudioError> {
        let path = local_source_path(&track.stream_url)?;
        let file = File::open(&path)
            .map_err(|e| AudioError::Open(format!("failed to open {}: {e}", path.display())))?;

        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::Open(format!("failed to decode {}: {e}", path.display())))?;

        // Prefer the decoded stream's own length; the catalog value is a hint.
        let duration = source.total_duration().or_else(|| track.duration_hint());

        let stream = self.stream()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        sink.pause();

        Ok(Box::new(RodioHandle { sink, duration }))
    }
}

struct RodioHandle {
    sink: Sink,
    duration: Option<Duration>,
}

impl AudioHandle for RodioHandle {
    fn play(&mut self) -> Result<(), AudioError> {
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn seek_to(&mut self, position: Duration) -> Result<(), AudioError> {
        self.sink
            .try_seek(position)
            .map_err(|e| AudioError::Seek(e.to_string()))
    }

    fn is_ready(&self) -> bool {
        // Decoding happened in `open`; the sink can start immediately.
        true
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

/// Resolve a catalog `streamUrl` to a local file path.
///
/// Accepts plain paths and `file://` URLs. Remote schemes are refused;
/// callers are expected to hand the session locally cached media.
pub(super) fn local_source_path(stream_url: &str) -> Result<PathBuf, AudioError> {
    if let Some(path) = stream_url.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if stream_url.contains("://") {
        return Err(AudioError::Open(format!(
            "unsupported stream source scheme: {stream_url}"
        )));
    }
    Ok(PathBuf::from(stream_url))
}
