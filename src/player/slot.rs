//! Ownership of the single live audio resource.
//!
//! All loads and releases go through [`Slot`], which keeps the invariant
//! that at most one audio handle exists: a new resource can only be opened
//! after the previous one has been stopped and dropped.

use tracing::debug;

use crate::catalog::Track;
use crate::error::AudioError;

use super::backend::{AudioBackend, AudioHandle};

pub(super) struct Slot {
    handle: Option<Box<dyn AudioHandle>>,
    volume: u8,
}

impl Slot {
    pub(super) fn new(volume: u8) -> Self {
        Self {
            handle: None,
            volume: clamp_level(volume),
        }
    }

    /// Replace the live resource with one for `track`.
    ///
    /// The previous resource is released before the new one is opened, and
    /// the current volume is applied before the handle is exposed, so the
    /// first audible moment already has the configured level.
    pub(super) fn load(
        &mut self,
        backend: &mut dyn AudioBackend,
        track: &Track,
    ) -> Result<(), AudioError> {
        self.dispose();
        let mut handle = backend.open(track)?;
        handle.set_volume(amplitude(self.volume));
        self.handle = Some(handle);
        Ok(())
    }

    /// Stop and drop the live resource, if any.
    pub(super) fn dispose(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            debug!("releasing audio resource");
            handle.stop();
        }
    }

    pub(super) fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    pub(super) fn handle(&self) -> Option<&dyn AudioHandle> {
        self.handle.as_deref()
    }

    pub(super) fn handle_mut(&mut self) -> Option<&mut (dyn AudioHandle + 'static)> {
        self.handle.as_deref_mut()
    }

    /// Remember `level` and apply it to the live resource, if any.
    pub(super) fn set_volume(&mut self, level: u8) {
        self.volume = clamp_level(level);
        let gain = amplitude(self.volume);
        if let Some(handle) = self.handle.as_deref_mut() {
            handle.set_volume(gain);
        }
    }

    pub(super) fn volume(&self) -> u8 {
        self.volume
    }
}

/// Clamp a requested volume level into the supported 0-100 range.
pub(super) fn clamp_level(level: u8) -> u8 {
    level.min(100)
}

/// Map a 0-100 level onto the backend's 0.0-1.0 gain scale.
pub(super) fn amplitude(level: u8) -> f32 {
    f32::from(clamp_level(level)) / 100.0
}
