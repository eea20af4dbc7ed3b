//! Deterministic scripted engine double
//!
//! The real calibration engine is an external vision library, which makes
//! desktop testing of the admission policy painful. This module provides a
//! miniature engine whose detection outcomes and error figures are fully
//! deterministic, so tests and the CLI demo can exercise every gate path
//! without camera hardware or calibration math.

use std::collections::VecDeque;

use crate::config::PatternConfig;
use crate::engine::{CalibrationEngine, CalibrationModel};
use crate::error::GateError;
use crate::frame::{check_formats, Frame};

/// Per-sample error figures are synthesized from the admission index so a
/// given session always reproduces the same model.
fn synthetic_sample_error(index: usize) -> f64 {
    0.1 + 0.05 * ((index * 7919) % 13) as f64 / 13.0
}

/// Samples whose error exceeds the mean by this factor are dropped during
/// cleaning (mirroring the outlier policy of the real engine).
const OUTLIER_FACTOR: f64 = 1.5;

/// A scripted stand-in for the external calibration engine
///
/// Detection outcomes follow an optional script: each `try_add_sample`
/// consumes one entry; when the script is exhausted (or absent) the pattern
/// is always "found". Call counts are exposed so tests can assert exactly
/// which engine operations a tick triggered.
pub struct ScriptedEngine {
    pattern: PatternConfig,
    sample_errors: Vec<f64>,
    next_sample_index: usize,
    detection_script: VecDeque<bool>,
    reprojection_error: f64,
    recalibrate_calls: usize,
    clean_calls: usize,
}

impl ScriptedEngine {
    pub fn new(pattern: PatternConfig) -> Self {
        Self {
            pattern,
            sample_errors: Vec::new(),
            next_sample_index: 0,
            detection_script: VecDeque::new(),
            reprojection_error: 0.0,
            recalibrate_calls: 0,
            clean_calls: 0,
        }
    }

    /// Script the next detection outcomes; exhausted script means "found"
    pub fn with_detection_script(mut self, outcomes: &[bool]) -> Self {
        self.detection_script = outcomes.iter().copied().collect();
        self
    }

    /// Number of recalibration passes run so far
    pub fn recalibrate_calls(&self) -> usize {
        self.recalibrate_calls
    }

    /// Number of cleaning passes run so far
    pub fn clean_calls(&self) -> usize {
        self.clean_calls
    }

    pub fn pattern(&self) -> &PatternConfig {
        &self.pattern
    }
}

impl CalibrationEngine for ScriptedEngine {
    fn try_add_sample(&mut self, _frame: &Frame) -> bool {
        let detected = self.detection_script.pop_front().unwrap_or(true);
        if detected {
            self.sample_errors
                .push(synthetic_sample_error(self.next_sample_index));
            self.next_sample_index += 1;
        }
        detected
    }

    fn recalibrate(&mut self) {
        self.recalibrate_calls += 1;
        if self.sample_errors.is_empty() {
            self.reprojection_error = 0.0;
            return;
        }
        // RMS over the per-sample figures, shrinking slowly as the set grows.
        let sum_sq: f64 = self.sample_errors.iter().map(|e| e * e).sum();
        self.reprojection_error =
            (sum_sq / self.sample_errors.len() as f64).sqrt() / (1.0 + 0.01 * self.sample_errors.len() as f64);
    }

    fn clean_outliers(&mut self) -> usize {
        self.clean_calls += 1;
        if self.sample_errors.is_empty() {
            return 0;
        }
        let mean: f64 =
            self.sample_errors.iter().sum::<f64>() / self.sample_errors.len() as f64;
        let before = self.sample_errors.len();
        self.sample_errors.retain(|&e| e <= mean * OUTLIER_FACTOR);
        before - self.sample_errors.len()
    }

    fn sample_count(&self) -> usize {
        self.sample_errors.len()
    }

    fn reprojection_error(&self) -> f64 {
        self.reprojection_error
    }

    fn sample_reprojection_errors(&self) -> Vec<f64> {
        self.sample_errors.clone()
    }

    fn undistort(&self, src: &Frame, dst: &mut Frame) -> Result<(), GateError> {
        check_formats(dst.format(), src.format())?;
        // The scripted model is distortion-free; undistortion is a copy.
        dst.copy_from(src)
    }

    fn model(&self) -> CalibrationModel {
        let f = 500.0 + self.pattern.square_size;
        CalibrationModel {
            camera_matrix: [[f, 0.0, 320.0], [0.0, f, 240.0], [0.0, 0.0, 1.0]],
            dist_coeffs: vec![0.0; 5],
            diagonal_fov: 77.3,
            reprojection_error: self.reprojection_error,
            sample_errors: self.sample_errors.clone(),
        }
    }
}
