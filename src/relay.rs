//! Single-slot latest-frame relay
//!
//! For deployments that split frame acquisition from gate evaluation across
//! threads, the handoff must carry only the most recent frame: a new frame
//! overwrites an unconsumed one, never queues behind it. The consumer side
//! drains the slot and runs `evaluate` with exclusive access to its own
//! gate state for the duration of the tick.

use std::sync::Mutex;

use crate::frame::Frame;

/// Latest-frame handoff slot with overwrite semantics
pub struct FrameRelay {
    slot: Mutex<Option<(Frame, f64)>>,
}

impl FrameRelay {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Publish a frame with its capture timestamp
    ///
    /// # Returns
    /// `true` if an unconsumed frame was overwritten
    pub fn publish(&self, frame: Frame, now: f64) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        let overwritten = slot.is_some();
        *slot = Some((frame, now));
        overwritten
    }

    /// Take the latest frame, leaving the slot empty
    pub fn take(&self) -> Option<(Frame, f64)> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.take()
    }
}

impl Default for FrameRelay {
    fn default() -> Self {
        Self::new()
    }
}
