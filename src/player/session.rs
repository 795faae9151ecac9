//! The playback session: transport state machine plus its thread loop.
//!
//! A session owns the backend, the resource slot, the queue and the
//! transport state, and is driven by two inputs only: commands from the
//! [`Player`](super::Player) facade and a periodic tick. The tick settles
//! pending loads, reports progress and performs auto-advance.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::Track;
use crate::error::AudioError;

use super::backend::AudioBackend;
use super::queue::PlayQueue;
use super::recorder::PlaybackRecorder;
use super::slot::Slot;
use super::types::{PlayerCmd, PlayerEvent, SessionHandle, TransportState};

pub(super) struct Session<B> {
    backend: B,
    slot: Slot,
    queue: PlayQueue,
    state: TransportState,
    /// Caller intent: keep audio running whenever a track is ready.
    desired_playing: bool,
    track: Option<Track>,
    position: Duration,
    duration: Option<Duration>,
    duration_announced: bool,
    error: Option<String>,
    info: SessionHandle,
    subscribers: Vec<Sender<PlayerEvent>>,
    recorder: Option<Box<dyn PlaybackRecorder>>,
}

impl<B: AudioBackend> Session<B> {
    pub(super) fn new(
        backend: B,
        volume: u8,
        info: SessionHandle,
        recorder: Option<Box<dyn PlaybackRecorder>>,
    ) -> Self {
        let session = Self {
            backend,
            slot: Slot::new(volume),
            queue: PlayQueue::new(),
            state: TransportState::Idle,
            desired_playing: false,
            track: None,
            position: Duration::ZERO,
            duration: None,
            duration_announced: false,
            error: None,
            info,
            subscribers: Vec::new(),
            recorder,
        };
        session.publish();
        session
    }

    /// Drive the session until shutdown, or until every sender is gone.
    pub(super) fn run(mut self, rx: Receiver<PlayerCmd>, tick_interval: Duration) {
        loop {
            match rx.recv_timeout(tick_interval) {
                Ok(cmd) => {
                    if !self.handle_cmd(cmd) {
                        return;
                    }
                }
                Err(RecvTimeoutError::Timeout) => self.tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    self.shutdown();
                    return;
                }
            }
        }
    }

    /// Process one command. Returns `false` once the session should end.
    pub(super) fn handle_cmd(&mut self, cmd: PlayerCmd) -> bool {
        match cmd {
            PlayerCmd::Select { track, context } => self.select(track, context),
            PlayerCmd::Play => self.play(),
            PlayerCmd::Pause => self.pause(),
            PlayerCmd::Toggle => self.toggle(),
            PlayerCmd::Next => self.skip_next(),
            PlayerCmd::Previous => self.skip_previous(),
            PlayerCmd::Seek(position) => self.seek(position),
            PlayerCmd::SetVolume(level) => self.set_volume(level),
            PlayerCmd::Stop => self.stop(),
            PlayerCmd::Subscribe(tx) => self.subscribers.push(tx),
            PlayerCmd::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        self.publish();
        true
    }

    /// Periodic pass: settle pending loads, report progress, auto-advance.
    pub(super) fn tick(&mut self) {
        match self.state {
            TransportState::Loading => self.settle_if_ready(),
            TransportState::Playing => {
                let status = self.slot.handle().map(|h| (h.is_finished(), h.position()));
                match status {
                    Some((true, _)) => self.handle_completion(),
                    Some((false, position)) => {
                        self.position = position;
                        self.emit(PlayerEvent::PositionUpdate {
                            position_ms: position.as_millis() as u64,
                            duration_ms: self.duration.map(|d| d.as_millis() as u64),
                        });
                    }
                    None => {}
                }
            }
            _ => {}
        }
        self.publish();
    }

    fn select(&mut self, track: Track, context: Option<Vec<Track>>) {
        let context = context.unwrap_or_default();
        if context.is_empty() {
            // No context: the selected track becomes a queue of one.
            self.queue.set_queue(vec![track.clone()], 0);
        } else {
            let start = context
                .iter()
                .position(|t| t.id == track.id)
                .unwrap_or(0);
            self.queue.set_queue(context, start);
        }
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.desired_playing = true;
        self.load(track);
    }

    /// Swap the active resource over to `track` and enter `Loading`.
    fn load(&mut self, track: Track) {
        self.record_play(&track);
        debug!("loading {} ({})", track.id, track.display_label());
        self.position = Duration::ZERO;
        self.duration = track.duration_hint();
        self.duration_announced = false;
        self.error = None;

        match self.slot.load(&mut self.backend, &track) {
            Ok(()) => {
                self.track = Some(track.clone());
                self.emit(PlayerEvent::TrackChanged { track });
                self.set_state(TransportState::Loading);
                self.settle_if_ready();
            }
            Err(e) => {
                warn!("failed to load {}: {e}", track.id);
                self.track = Some(track);
                self.error = Some(e.to_string());
                self.set_state(TransportState::Failed);
                self.emit(PlayerEvent::LoadFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Leave `Loading` once the resource can start, honoring the recorded
    /// play/pause intent. The stream's own duration replaces the catalog
    /// hint and is announced exactly once per load.
    fn settle_if_ready(&mut self) {
        if self.state != TransportState::Loading {
            return;
        }
        let Some((ready, stream_duration)) =
            self.slot.handle().map(|h| (h.is_ready(), h.duration()))
        else {
            return;
        };
        if !ready {
            return;
        }
        if stream_duration.is_some() {
            self.duration = stream_duration;
        }
        if !self.duration_announced {
            self.duration_announced = true;
            self.emit(PlayerEvent::DurationReady {
                duration_ms: self.duration.map(|d| d.as_millis() as u64),
            });
        }
        if self.desired_playing {
            self.start_playback();
        } else {
            self.set_state(TransportState::Paused);
        }
    }

    fn start_playback(&mut self) {
        let Some(result) = self.slot.handle_mut().map(|h| h.play()) else {
            return;
        };
        match result {
            Ok(()) => self.set_state(TransportState::Playing),
            Err(AudioError::Rejected) => {
                // Stay paused but keep the intent; a later gesture retries.
                warn!("output runtime rejected playback");
                self.set_state(TransportState::Paused);
                self.emit(PlayerEvent::PlaybackRejected);
            }
            Err(e) => {
                warn!("failed to start playback: {e}");
                self.slot.dispose();
                self.error = Some(e.to_string());
                self.set_state(TransportState::Failed);
                self.emit(PlayerEvent::LoadFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    fn play(&mut self) {
        self.desired_playing = true;
        // During a load the recorded intent is enough; it applies on ready.
        if self.state == TransportState::Paused {
            self.start_playback();
        }
    }

    fn pause(&mut self) {
        self.desired_playing = false;
        if self.state == TransportState::Playing {
            if let Some(handle) = self.slot.handle_mut() {
                handle.pause();
            }
            self.refresh_position();
            self.set_state(TransportState::Paused);
        }
    }

    fn toggle(&mut self) {
        if self.state == TransportState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    fn skip_next(&mut self) {
        let Some(track) = self.queue.next().cloned() else {
            return;
        };
        self.desired_playing = true;
        self.load(track);
    }

    fn skip_previous(&mut self) {
        let Some(track) = self.queue.previous().cloned() else {
            return;
        };
        self.desired_playing = true;
        self.load(track);
    }

    fn seek(&mut self, target: Duration) {
        if !matches!(
            self.state,
            TransportState::Playing | TransportState::Paused
        ) {
            debug!("ignoring seek in state {}", self.state);
            return;
        }
        let clamped = match self.duration {
            Some(duration) => target.min(duration),
            None => target,
        };
        let Some(result) = self.slot.handle_mut().map(|h| h.seek_to(clamped)) else {
            return;
        };
        match result {
            Ok(()) => {
                self.position = clamped;
                self.emit(PlayerEvent::PositionUpdate {
                    position_ms: clamped.as_millis() as u64,
                    duration_ms: self.duration.map(|d| d.as_millis() as u64),
                });
            }
            Err(e) => warn!("seek to {:?} failed: {e}", clamped),
        }
    }

    fn set_volume(&mut self, level: u8) {
        self.slot.set_volume(level);
        let level = self.slot.volume();
        debug!("volume set to {level}");
        self.emit(PlayerEvent::VolumeChanged { level });
    }

    /// Release the resource and forget the active track. The queue stays,
    /// so next/previous keep working from the old cursor.
    fn stop(&mut self) {
        self.slot.dispose();
        self.track = None;
        self.desired_playing = false;
        self.position = Duration::ZERO;
        self.duration = None;
        self.duration_announced = false;
        self.error = None;
        self.set_state(TransportState::Idle);
    }

    fn shutdown(&mut self) {
        debug!("session shutting down");
        self.stop();
        self.publish();
    }

    /// Natural end of the active track: advance through the queue, or end
    /// the session's playback when there is nowhere further to go.
    fn handle_completion(&mut self) {
        let finished_id = match &self.track {
            Some(track) => track.id.clone(),
            None => return,
        };
        info!("track {finished_id} finished");
        self.emit(PlayerEvent::TrackFinished {
            track_id: finished_id,
        });

        if self.queue.len() > 1 {
            if let Some(track) = self.queue.next().cloned() {
                // Auto-advance always carries the intent to keep playing.
                self.desired_playing = true;
                self.load(track);
                return;
            }
        }

        // Lone entry or empty queue: stay on this track, ended, until the
        // caller makes a new gesture.
        if let Some(duration) = self.duration {
            self.position = duration;
        }
        self.set_state(TransportState::Ended);
    }

    fn refresh_position(&mut self) {
        if let Some(position) = self.slot.handle().map(|h| h.position()) {
            self.position = position;
        }
    }

    fn record_play(&mut self, track: &Track) {
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.record_play(track) {
                warn!("failed to record play of {}: {e}", track.id);
            }
        }
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state == state {
            return;
        }
        debug!("transport {} -> {}", self.state, state);
        self.state = state;
        self.emit(PlayerEvent::StateChanged { state });
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.track = self.track.clone();
            info.state = self.state;
            info.position = self.position;
            info.duration = self.duration;
            info.volume = self.slot.volume();
            info.desired_playing = self.desired_playing;
            info.error = self.error.clone();
        }
    }
}

pub(super) fn spawn_session<B, F>(
    factory: F,
    rx: Receiver<PlayerCmd>,
    info: SessionHandle,
    recorder: Option<Box<dyn PlaybackRecorder>>,
    volume: u8,
    tick_interval: Duration,
) -> JoinHandle<()>
where
    B: AudioBackend + 'static,
    F: FnOnce() -> B + Send + 'static,
{
    thread::spawn(move || {
        // The backend is created on the session thread; implementations may
        // hold resources that cannot leave their creating thread.
        let backend = factory();
        Session::new(backend, volume, info, recorder).run(rx, tick_interval);
    })
}
