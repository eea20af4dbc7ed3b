//! Core telemetry event types describing per-tick diagnostics exposed to
//! the CLI surface and session logs.

use serde::{Deserialize, Serialize};

use crate::gate::Action;

/// Read-only projection of gate + engine state for one tick
///
/// Mirrors the overlay the interactive app draws every frame: movement,
/// sample count, overall and per-sample reprojection errors, and the
/// field-of-view/distortion summary of the current model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub active: bool,
    pub motion_score: f64,
    pub sample_count: usize,
    pub reprojection_error: f64,
    pub sample_errors: Vec<f64>,
    pub diagonal_fov: f64,
    pub dist_coeffs: Vec<f64>,
}

/// Per-tick events emitted by the session loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GateEvent {
    /// One frame evaluated
    Tick {
        time: f64,
        action: Action,
        report: TickReport,
    },
    /// The admission toggle flipped
    ActiveChanged { active: bool },
    /// A durable model write failed (warn-and-continue)
    PersistFailed { context: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> TickReport {
        TickReport {
            active: true,
            motion_score: 0.25,
            sample_count: 4,
            reprojection_error: 0.31,
            sample_errors: vec![0.2, 0.3, 0.35, 0.4],
            diagonal_fov: 77.3,
            dist_coeffs: vec![0.0; 5],
        }
    }

    #[test]
    fn test_tick_event_serialization() {
        let event = GateEvent::Tick {
            time: 1.5,
            action: Action::Admitted,
            report: sample_report(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"tick\""));
        assert!(json.contains("\"admitted\""));

        let parsed: GateEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_action_snake_case_tags() {
        assert_eq!(
            serde_json::to_string(&Action::AdmittedAndCleaned).unwrap(),
            "\"admitted_and_cleaned\""
        );
        assert_eq!(serde_json::to_string(&Action::Skipped).unwrap(), "\"skipped\"");
    }
}
