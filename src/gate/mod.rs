// SampleGate - stability-gated sample accumulator
//
// The per-tick decision engine of the auto-calibration session. Frame by
// frame it decides whether to feed the current frame to the calibration
// engine, when to recalibrate, when to prune outliers, and when to persist
// the refined model. The goal is to keep redundant and motion-blurred
// frames out of the sample set without any user interaction beyond a
// pause toggle.
//
// Admission rules (all must hold):
// 1. The gate is active.
// 2. Strictly more than `min_interval` seconds since the last admission.
// 3. Motion score strictly below `motion_threshold`.
//
// Each tick is atomic: the gate always returns to idle, with no
// mid-calibration state surviving across ticks.

pub mod state;


pub use state::GateState;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::engine::CalibrationEngine;
use crate::error::{log_gate_error, GateError};
use crate::frame::{check_formats, motion_score, Frame, FrameFormat};
use crate::storage::ModelStore;
use crate::telemetry::TickReport;

/// What a single tick did, for observability and testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Gate inactive, interval not elapsed, or scene in motion
    Skipped,
    /// Frame was eligible but the engine found no pattern in it
    Rejected,
    /// Sample admitted, model recalibrated and persisted
    Admitted,
    /// Sample admitted and the grown sample set was outlier-cleaned
    AdmittedAndCleaned,
}

impl Action {
    /// Whether this tick added a sample to the engine
    pub fn admitted(&self) -> bool {
        matches!(self, Action::Admitted | Action::AdmittedAndCleaned)
    }
}

/// The stability-gated sample accumulator
///
/// Owns the previous-frame buffer (always the most recently *seen* frame,
/// not the most recently admitted one) and the undistorted display buffer,
/// both primed from the frame source's format at construction.
pub struct SampleGate {
    config: GateConfig,
    state: GateState,
    previous: Frame,
    undistorted: Frame,
    store: ModelStore,
    /// True until the first frame lands in the previous-frame buffer
    primed: bool,
    last_motion_score: f64,
    last_persist_error: Option<GateError>,
}

impl SampleGate {
    /// Create a gate with buffers mimicking the frame source's format
    pub fn new(config: GateConfig, format: &FrameFormat, store: ModelStore) -> Self {
        Self {
            config,
            state: GateState::new(),
            previous: Frame::mimic(format),
            undistorted: Frame::mimic(format),
            store,
            primed: false,
            last_motion_score: 0.0,
            last_persist_error: None,
        }
    }

    /// Evaluate one frame
    ///
    /// Computes the motion score against the stored previous frame,
    /// unconditionally rolls the previous-frame buffer forward, then runs
    /// the admission policy against `engine`. When any samples exist the
    /// current frame is also undistorted into the display buffer,
    /// regardless of this tick's admission outcome.
    ///
    /// # Arguments
    /// * `engine` - External calibration engine mutated on admission
    /// * `frame` - Current frame; must match the primed buffer format
    /// * `now` - Monotonic timestamp in seconds
    ///
    /// # Returns
    /// * `Ok(Action)` - What the tick did
    /// * `Err(GateError::FormatMismatch)` - Incompatible frame; the tick is
    ///   skipped and no gate or engine state changes
    ///
    /// Engine rejection of an eligible frame is the expected common case
    /// and surfaces as `Ok(Action::Rejected)`, never as an error. A failed
    /// model write logs a warning and the tick still counts as admitted;
    /// the next admission cycle rewrites the file.
    pub fn evaluate(
        &mut self,
        engine: &mut dyn CalibrationEngine,
        frame: &Frame,
        now: f64,
    ) -> Result<Action, GateError> {
        check_formats(self.previous.format(), frame.format()).inspect_err(|err| {
            log_gate_error(err, "evaluate");
        })?;

        // First tick: previous = current, so the score is exactly zero.
        if !self.primed {
            self.previous.copy_from(frame)?;
            self.primed = true;
        }

        let score = motion_score(frame, &self.previous)?;
        self.last_motion_score = score;

        // The buffer tracks the latest seen frame even when the gate is
        // inactive or the scene is moving.
        self.previous.copy_from(frame)?;

        let should_try_admit = self.state.active
            && now - self.state.last_accepted_time > self.config.min_interval
            && score < self.config.motion_threshold;

        let action = if !should_try_admit {
            Action::Skipped
        } else if !engine.try_add_sample(frame) {
            debug!("[Gate] Still frame at t={:.3}s but no pattern found", now);
            Action::Rejected
        } else {
            info!(
                "[Gate] Sample admitted at t={:.3}s (motion={:.4}), re-calibrating",
                now, score
            );
            engine.recalibrate();

            let cleaned = engine.sample_count() > self.config.cleaning_floor;
            if cleaned {
                let removed = engine.clean_outliers();
                info!(
                    "[Gate] Cleaned outliers: removed {}, {} samples remain",
                    removed,
                    engine.sample_count()
                );
            }

            if let Err(err) = self.store.save(&engine.model()) {
                // Warn-and-continue: the in-memory model keeps the sample
                // and durable state catches up on the next admission.
                log_gate_error(&err, "persist_model");
                self.last_persist_error = Some(err);
            }

            self.state.last_accepted_time = now;
            if cleaned {
                Action::AdmittedAndCleaned
            } else {
                Action::Admitted
            }
        };

        if engine.sample_count() > 0 {
            engine.undistort(frame, &mut self.undistorted)?;
        }

        Ok(action)
    }

    /// Flip the admission toggle (the original's spacebar)
    ///
    /// Pausing resets nothing: resuming re-enables admission subject to the
    /// same interval/motion checks from where they left off.
    pub fn toggle_active(&mut self) {
        self.state.active = !self.state.active;
        info!(
            "[Gate] Auto-capture {}",
            if self.state.active { "resumed" } else { "paused" }
        );
    }

    pub fn set_active(&mut self, active: bool) {
        self.state.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Motion score computed by the most recent tick
    pub fn last_motion_score(&self) -> f64 {
        self.last_motion_score
    }

    /// Undistorted display buffer (meaningful once any samples exist)
    pub fn undistorted(&self) -> &Frame {
        &self.undistorted
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Persistence failure recorded by the most recent admission, if any
    pub fn take_persist_error(&mut self) -> Option<GateError> {
        self.last_persist_error.take()
    }

    /// Read-only projection of gate + engine state, recomputed every tick
    pub fn report(&self, engine: &dyn CalibrationEngine) -> TickReport {
        let model = engine.model();
        TickReport {
            active: self.state.active,
            motion_score: self.last_motion_score,
            sample_count: engine.sample_count(),
            reprojection_error: engine.reprojection_error(),
            sample_errors: engine.sample_reprojection_errors(),
            diagonal_fov: model.diagonal_fov,
            dist_coeffs: model.dist_coeffs,
        }
    }
}
