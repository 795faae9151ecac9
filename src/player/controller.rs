//! Public facade over the playback session thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::catalog::Track;
use crate::config::Settings;
use crate::error::PlayerError;

use super::backend::AudioBackend;
use super::output::RodioBackend;
use super::recorder::PlaybackRecorder;
use super::session::spawn_session;
use super::slot::clamp_level;
use super::types::{PlayerCmd, PlayerEvent, SessionHandle, SessionInfo};

/// Handle to a playback session.
///
/// All methods hand a command to the session thread and return immediately;
/// outcomes show up in the snapshot and as [`PlayerEvent`]s. Dropping the
/// last `Player` shuts the session down and releases the audio resource.
pub struct Player {
    tx: Sender<PlayerCmd>,
    info: SessionHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start a session on the default `rodio` output.
    pub fn new(settings: &Settings) -> Self {
        Self::with_backend(settings, RodioBackend::new, None)
    }

    /// Start a session on the default output with a playback recorder.
    pub fn with_recorder(settings: &Settings, recorder: Box<dyn PlaybackRecorder>) -> Self {
        Self::with_backend(settings, RodioBackend::new, Some(recorder))
    }

    /// Start a session on a custom backend.
    ///
    /// The factory runs on the session thread, so the backend itself does
    /// not have to be `Send`.
    pub fn with_backend<B, F>(
        settings: &Settings,
        factory: F,
        recorder: Option<Box<dyn PlaybackRecorder>>,
    ) -> Self
    where
        B: AudioBackend + 'static,
        F: FnOnce() -> B + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let info: SessionHandle = Arc::new(Mutex::new(SessionInfo {
            volume: clamp_level(settings.playback.volume),
            ..SessionInfo::default()
        }));

        let join = spawn_session(
            factory,
            rx,
            info.clone(),
            recorder,
            settings.playback.volume,
            settings.engine.tick_interval(),
        );

        Self {
            tx,
            info,
            join: Mutex::new(Some(join)),
        }
    }

    /// Load `track` and start playing it once ready.
    ///
    /// With a non-empty `context` the queue becomes that list, positioned at
    /// the selected track; otherwise the queue becomes just this track.
    pub fn select_track(
        &self,
        track: Track,
        context: Option<Vec<Track>>,
    ) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Select { track, context })
    }

    pub fn play(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Play)
    }

    pub fn pause(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Pause)
    }

    pub fn toggle(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Toggle)
    }

    pub fn next(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Next)
    }

    pub fn previous(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Previous)
    }

    pub fn seek(&self, position: Duration) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Seek(position))
    }

    pub fn set_volume(&self, level: u8) -> Result<(), PlayerError> {
        self.send(PlayerCmd::SetVolume(level))
    }

    /// Release the audio resource and clear the active track, keeping the
    /// queue for later next/previous gestures.
    pub fn stop(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Stop)
    }

    /// Register for session events. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Result<Receiver<PlayerEvent>, PlayerError> {
        let (tx, rx) = mpsc::channel();
        self.send(PlayerCmd::Subscribe(tx))?;
        Ok(rx)
    }

    /// Shared snapshot handle for observers that poll.
    pub fn session_handle(&self) -> SessionHandle {
        self.info.clone()
    }

    /// Copy of the current session snapshot.
    pub fn snapshot(&self) -> SessionInfo {
        self.info
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// End the session: release the audio resource and join the thread.
    ///
    /// Also runs on drop; calling it more than once is fine.
    pub fn close(&self) {
        let _ = self.send(PlayerCmd::Shutdown);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }

    fn send(&self, cmd: PlayerCmd) -> Result<(), PlayerError> {
        self.tx.send(cmd).map_err(|_| PlayerError::Closed)
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.close();
    }
}
