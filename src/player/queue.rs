//! Queue bookkeeping for the playback session.
//!
//! The queue is a flat track list with a cursor. Navigation wraps in both
//! directions, so every queue behaves as a loop no matter where playback
//! started.

use crate::catalog::Track;

#[derive(Debug, Default)]
pub(super) struct PlayQueue {
    tracks: Vec<Track>,
    current: usize,
}

impl PlayQueue {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Replace the queue contents and point the cursor at `start_index`.
    ///
    /// An out-of-range `start_index` falls back to the first entry.
    pub(super) fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        self.current = if start_index < tracks.len() {
            start_index
        } else {
            0
        };
        self.tracks = tracks;
    }

    pub(super) fn len(&self) -> usize {
        self.tracks.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub(super) fn current_index(&self) -> Option<usize> {
        (!self.tracks.is_empty()).then_some(self.current)
    }

    pub(super) fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    /// Index of the entry with `track_id`, if present.
    pub(super) fn position_of(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// Advance the cursor, wrapping past the last entry to the first.
    pub(super) fn next(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.tracks.len();
        self.tracks.get(self.current)
    }

    /// Move the cursor back, wrapping past the first entry to the last.
    pub(super) fn previous(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current = (self.current + self.tracks.len() - 1) % self.tracks.len();
        self.tracks.get(self.current)
    }
}
