//! Playback engine: transport state machine, queue, and the output seam.
//!
//! This module exposes the [`Player`] facade plus the types observers need
//! to follow a session (state, snapshot, events). The engine itself runs on
//! a background thread owned by the `Player`.

mod backend;
mod controller;
mod output;
mod queue;
mod recorder;
mod session;
mod slot;
mod types;

pub use backend::{AudioBackend, AudioHandle};
pub use controller::Player;
pub use output::RodioBackend;
pub use recorder::{PlaybackRecorder, RecordError};
pub use types::{PlayerEvent, SessionHandle, SessionInfo, TransportState};
