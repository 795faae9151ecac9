//! Output backend seam.
//!
//! The session drives audio through these traits so transport logic stays
//! independent of the output runtime. [`RodioBackend`](super::RodioBackend)
//! is the production implementation; tests substitute a scripted one.

use std::time::Duration;

use crate::catalog::Track;
use crate::error::AudioError;

/// Factory for audio resources.
///
/// A backend may hold runtime state shared by all handles it creates, such
/// as the OS output stream. It lives on the session thread and is never
/// shared, so implementations are free to use non-`Send` internals.
pub trait AudioBackend {
    /// Open a playable resource for `track`.
    ///
    /// Called only after any previous handle has been disposed; at most one
    /// handle obtained from a backend is alive at a time.
    fn open(&mut self, track: &Track) -> Result<Box<dyn AudioHandle>, AudioError>;
}

/// A single live audio resource.
///
/// Handles start out paused. The session applies the current volume before
/// the first `play`, so no audio is produced at an unconfigured level.
pub trait AudioHandle {
    /// Start or resume audio output.
    ///
    /// Returns [`AudioError::Rejected`] when the output runtime refuses to
    /// start, as some runtimes do without a recent user gesture.
    fn play(&mut self) -> Result<(), AudioError>;

    /// Suspend audio output, keeping the position.
    fn pause(&mut self);

    /// Halt output and release the underlying resource.
    fn stop(&mut self);

    /// Set the output gain, `0.0` silent to `1.0` full scale.
    fn set_volume(&mut self, volume: f32);

    /// Jump to `position`. The caller clamps against the known duration
    /// first; implementations report anything the stream still refuses.
    fn seek_to(&mut self, position: Duration) -> Result<(), AudioError>;

    /// Whether enough of the stream is available to start playback.
    fn is_ready(&self) -> bool;

    /// Duration reported by the stream itself, when it knows one.
    fn duration(&self) -> Option<Duration>;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Whether the stream has played to its end.
    fn is_finished(&self) -> bool;
}
