//! Hook for reporting track selections to a scrobble or history service.

use crate::catalog::Track;

pub type RecordError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Receives one call per track the session starts loading, including loads
/// triggered by auto-advance.
///
/// Recording is fire-and-forget: failures are logged by the session and
/// never affect playback. Implementations should stay quick, since the call
/// happens on the session thread.
pub trait PlaybackRecorder: Send {
    fn record_play(&mut self, track: &Track) -> Result<(), RecordError>;
}
