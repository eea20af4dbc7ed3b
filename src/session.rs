//! Live session loop: source -> gate -> engine -> telemetry
//!
//! This is the orchestration the interactive app runs once per rendered
//! frame, separated from any windowing so the CLI and tests can drive it
//! with a synthetic clock. One tick grabs at most one frame, evaluates it,
//! and emits one telemetry event.

use crate::config::AppConfig;
use crate::engine::CalibrationEngine;
use crate::error::{log_gate_error, ErrorCode};
use crate::gate::{Action, SampleGate};
use crate::source::FrameSource;
use crate::storage::ModelStore;
use crate::telemetry::GateEvent;

/// A running auto-calibration session
pub struct Session<S: FrameSource, E: CalibrationEngine> {
    source: S,
    engine: E,
    gate: SampleGate,
}

impl<S: FrameSource, E: CalibrationEngine> Session<S, E> {
    /// Wire a source and an engine to a freshly primed gate
    pub fn new(config: &AppConfig, source: S, engine: E, store: ModelStore) -> Self {
        let format = source.format();
        let gate = SampleGate::new(config.gate.clone(), &format, store);
        Self {
            source,
            engine,
            gate,
        }
    }

    /// Process one tick at timestamp `now` (seconds)
    ///
    /// Returns `None` when the source has no new frame. A format mismatch
    /// from the gate degrades to a `Skipped` tick here; it never aborts the
    /// session.
    pub fn tick(&mut self, now: f64) -> Option<GateEvent> {
        if !self.source.is_frame_new() {
            return None;
        }
        let frame = self.source.grab();

        let action = match self.gate.evaluate(&mut self.engine, &frame, now) {
            Ok(action) => action,
            Err(err) => {
                log_gate_error(&err, "session_tick");
                Action::Skipped
            }
        };

        Some(GateEvent::Tick {
            time: now,
            action,
            report: self.gate.report(&self.engine),
        })
    }

    /// Run a fixed number of ticks at a synthetic frame rate
    pub fn run(&mut self, ticks: usize, fps: f64) -> Vec<GateEvent> {
        let mut events = Vec::with_capacity(ticks);
        for i in 0..ticks {
            let now = i as f64 / fps;
            if let Some(event) = self.tick(now) {
                events.push(event);
            }
            if let Some(err) = self.gate.take_persist_error() {
                events.push(GateEvent::PersistFailed {
                    context: err.message(),
                });
            }
        }
        tracing::debug!(
            "Session run complete: {} ticks, {} events",
            ticks,
            events.len()
        );
        events
    }

    /// Flip the admission toggle, reporting the new state
    pub fn set_active(&mut self, active: bool) -> GateEvent {
        self.gate.set_active(active);
        GateEvent::ActiveChanged { active }
    }

    pub fn gate(&self) -> &SampleGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut SampleGate {
        &mut self.gate
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
