//! Playback-related small types and handles.
//!
//! This module defines the transport states, session commands, the shared
//! session snapshot and the events broadcast to subscribers.

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::Track;

/// Where the transport currently stands for the active track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// No track selected; no audio resource exists.
    Idle,
    /// A resource exists but is not ready for playback yet.
    Loading,
    /// Ready with playback suspended.
    Paused,
    /// Ready and audibly playing.
    Playing,
    /// The track ran to completion and nothing followed it.
    Ended,
    /// The last load failed; no live resource exists.
    Failed,
}

impl Default for TransportState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Paused => "paused",
            Self::Playing => "playing",
            Self::Ended => "ended",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug)]
pub(crate) enum PlayerCmd {
    /// Load a track, optionally replacing the queue with a context list.
    Select {
        track: Track,
        context: Option<Vec<Track>>,
    },
    /// Resume, or record the intent to play while a load is in flight.
    Play,
    /// Suspend, or record the intent to stay paused while a load is in flight.
    Pause,
    /// Flip between play and pause.
    Toggle,
    /// Skip to the next queue entry (wraps at the end).
    Next,
    /// Go back to the previous queue entry (wraps at the start).
    Previous,
    /// Jump to a position within the active track.
    Seek(Duration),
    /// Set the volume level (0-100).
    SetVolume(u8),
    /// Release the active resource and clear the active track.
    Stop,
    /// Register an event subscriber.
    Subscribe(Sender<PlayerEvent>),
    /// Release everything and end the session thread.
    Shutdown,
}

/// Session snapshot shared with observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// The active track, if any.
    pub track: Option<Track>,
    /// Current transport state.
    pub state: TransportState,
    /// Playback position within the active track.
    pub position: Duration,
    /// Known duration of the active track, once the stream reports one.
    pub duration: Option<Duration>,
    /// Current volume level (0-100).
    pub volume: u8,
    /// Whether the caller wants audio running once the track is ready.
    pub desired_playing: bool,
    /// Message from the most recent load failure, if the state is `Failed`.
    pub error: Option<String>,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            track: None,
            state: TransportState::Idle,
            position: Duration::ZERO,
            duration: None,
            volume: 100,
            desired_playing: false,
            error: None,
        }
    }
}

pub type SessionHandle = Arc<Mutex<SessionInfo>>;

/// Events emitted by the playback session.
///
/// Subscribers receive these over a channel; slow or dropped subscribers are
/// pruned rather than blocking the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Transport state changed.
    StateChanged { state: TransportState },
    /// A new track became the active track.
    TrackChanged { track: Track },
    /// Stream metadata settled; emitted once per load.
    DurationReady { duration_ms: Option<u64> },
    /// Periodic position report while playing, and after a seek.
    PositionUpdate {
        position_ms: u64,
        duration_ms: Option<u64>,
    },
    /// The active track played to its end.
    TrackFinished { track_id: String },
    /// The output runtime refused to start audio; intent to play is kept.
    PlaybackRejected,
    /// A load failed; the session is in the `Failed` state.
    LoadFailed { message: String },
    /// Volume level changed.
    VolumeChanged { level: u8 },
    /// The queue was replaced.
    QueueChanged { length: usize },
}
