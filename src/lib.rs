//! Queue-driven audio playback controller for streaming music clients.
//!
//! `attacca` plays one track at a time: it owns a single live audio
//! resource, runs a transport state machine around it, and walks a queue
//! that wraps around in both directions. Hosts drive playback through a
//! [`Player`] handle; the engine runs on its own thread and reports back
//! through a shared snapshot and an event channel.
//!
//! ```no_run
//! use attacca::{Player, Settings, Track};
//!
//! let settings = Settings::load().unwrap_or_default();
//! let player = Player::new(&settings);
//!
//! let track = Track {
//!     id: "trk-1".into(),
//!     title: "Aria".into(),
//!     artist_name: "Cantor".into(),
//!     album_name: "Recital".into(),
//!     cover_url: String::new(),
//!     duration: Some(215.0),
//!     stream_url: "/music/aria.flac".into(),
//! };
//! player.select_track(track, None)?;
//! # Ok::<(), attacca::PlayerError>(())
//! ```

mod catalog;
mod config;
mod error;
mod player;

pub use catalog::Track;
pub use config::{
    EngineSettings, PlaybackSettings, Settings, default_config_path, resolve_config_path,
};
pub use error::{AudioError, PlayerError};
pub use player::{
    AudioBackend, AudioHandle, PlaybackRecorder, Player, PlayerEvent, RecordError, RodioBackend,
    SessionHandle, SessionInfo, TransportState,
};
