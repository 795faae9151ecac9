//! Error types shared across the playback controller.

use thiserror::Error;

/// Failures raised by an audio backend while opening or driving a stream.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The stream source could not be opened or decoded.
    #[error("failed to open stream source: {0}")]
    Open(String),

    /// The output runtime refused to start playback. The controller stays
    /// paused with intent-to-play recorded so a later gesture can retry.
    #[error("playback rejected by the output runtime")]
    Rejected,

    /// A seek request could not be applied to the live stream.
    #[error("seek failed: {0}")]
    Seek(String),
}

/// Errors returned by [`Player`](crate::Player) entry points.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The background session has shut down and no longer accepts commands.
    #[error("player session is no longer running")]
    Closed,
}
