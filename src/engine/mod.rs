// Calibration engine seam
//
// The crate does not implement calibration mathematics. This module defines
// the trait through which the gate drives an external engine (pattern
// detection, intrinsic refinement, outlier cleaning, undistortion) plus the
// serializable model snapshot the gate persists after each admission cycle.
//
// A deterministic scripted engine lives in `scripted` for the CLI demo and
// for tests that need full control over detection outcomes.

pub mod scripted;

pub use scripted::ScriptedEngine;

use serde::{Deserialize, Serialize};

use crate::error::GateError;
use crate::frame::Frame;

/// Snapshot of the calibration model, persisted after every successful
/// admission cycle
///
/// The durable file always holds a complete snapshot: intrinsics, distortion
/// coefficients, and the per-sample bookkeeping needed to resume inspection
/// of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    /// 3x3 intrinsic camera matrix, row-major
    pub camera_matrix: [[f64; 3]; 3],
    /// Lens distortion coefficients (k1, k2, p1, p2, k3)
    pub dist_coeffs: Vec<f64>,
    /// Diagonal field of view estimate in degrees
    pub diagonal_fov: f64,
    /// Overall RMS reprojection error across all samples
    pub reprojection_error: f64,
    /// Per-sample reprojection errors, in admission order
    pub sample_errors: Vec<f64>,
}

impl CalibrationModel {
    /// Number of samples backing this model
    pub fn sample_count(&self) -> usize {
        self.sample_errors.len()
    }
}

/// External calibration engine driven by the gate
///
/// All calls are bounded synchronous operations; recalibration cost grows
/// with sample count, which is an accepted trade-off of the session design.
pub trait CalibrationEngine {
    /// Attempt to add the frame as a calibration sample
    ///
    /// # Returns
    /// * `true` - Pattern detected, sample recorded
    /// * `false` - Pattern not found; the expected common case, not an error
    fn try_add_sample(&mut self, frame: &Frame) -> bool;

    /// Re-run intrinsic refinement over the current sample set
    fn recalibrate(&mut self);

    /// Remove high-error outlier samples
    ///
    /// # Returns
    /// Number of samples removed (may be zero)
    fn clean_outliers(&mut self) -> usize;

    /// Current size of the sample set
    fn sample_count(&self) -> usize;

    /// Overall RMS reprojection error of the current model
    fn reprojection_error(&self) -> f64;

    /// Per-sample reprojection errors, in admission order
    fn sample_reprojection_errors(&self) -> Vec<f64>;

    /// Undistort `src` into `dst` using the current model
    ///
    /// Only meaningful once at least one sample has been admitted; the gate
    /// never calls this on an empty sample set.
    fn undistort(&self, src: &Frame, dst: &mut Frame) -> Result<(), GateError>;

    /// Snapshot the current model for persistence
    fn model(&self) -> CalibrationModel;
}
