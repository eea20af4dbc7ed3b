//! Integration tests for the auto-calibration session
//!
//! These tests validate the complete loop across the crate: synthetic
//! camera frames through the gate into the scripted engine, with model
//! persistence and telemetry checked end to end. They use the public API
//! only, the way the CLI harness does.

use std::path::PathBuf;

use autocalib::config::{AppConfig, GateConfig, PatternSettings};
use autocalib::engine::{CalibrationEngine, ScriptedEngine};
use autocalib::frame::FrameFormat;
use autocalib::gate::Action;
use autocalib::session::Session;
use autocalib::source::SyntheticCamera;
use autocalib::storage::ModelStore;
use autocalib::telemetry::GateEvent;

fn temp_model_path(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "autocalib_it_{}_{}.json",
        tag,
        std::process::id()
    ));
    std::fs::remove_file(&path).ok();
    path
}

fn build_session(tag: &str, seed: u64, shake_every: usize) -> Session<SyntheticCamera, ScriptedEngine> {
    let config = AppConfig::default();
    let pattern = config.pattern.resolve().unwrap();
    let source =
        SyntheticCamera::new(FrameFormat::new(32, 24, 3), seed).with_shake_every(shake_every);
    Session::new(
        &config,
        source,
        ScriptedEngine::new(pattern),
        ModelStore::new(temp_model_path(tag)),
    )
}

fn tick_actions(events: &[GateEvent]) -> Vec<(f64, Action)> {
    events
        .iter()
        .filter_map(|e| match e {
            GateEvent::Tick { time, action, .. } => Some((*time, *action)),
            _ => None,
        })
        .collect()
}

/// A full quiet session: admissions are spaced by more than the minimum
/// interval and the persisted model always matches the in-memory engine.
#[test]
fn test_full_session_respects_interval_and_persists() {
    let mut session = build_session("full", 11, 0);
    let events = session.run(150, 30.0);

    let admissions: Vec<f64> = tick_actions(&events)
        .into_iter()
        .filter(|(_, a)| a.admitted())
        .map(|(t, _)| t)
        .collect();
    assert!(!admissions.is_empty());
    for pair in admissions.windows(2) {
        assert!(
            pair[1] - pair[0] > 1.0,
            "admissions {:?} violate the minimum interval",
            pair
        );
    }

    let persisted = session.gate().store().load().unwrap();
    assert_eq!(persisted.sample_count(), session.engine().sample_count());
    assert_eq!(
        persisted.reprojection_error,
        session.engine().reprojection_error()
    );

    std::fs::remove_file(session.gate().store().path()).ok();
}

/// Shake windows block admission: no sample is ever admitted on a tick
/// whose motion score breaches the threshold.
#[test]
fn test_shaking_scene_blocks_admission() {
    let mut session = build_session("shake", 23, 40);
    let events = session.run(200, 30.0);

    let mut saw_shake = false;
    for event in &events {
        if let GateEvent::Tick { action, report, .. } = event {
            if action.admitted() {
                assert!(
                    report.motion_score < 2.5,
                    "admitted at motion {}",
                    report.motion_score
                );
            }
            if report.motion_score >= 2.5 {
                saw_shake = true;
            }
        }
    }
    assert!(saw_shake, "the synthetic shake never registered");
    std::fs::remove_file(session.gate().store().path()).ok();
}

/// Pausing mid-session freezes sample growth; resuming picks the policy
/// back up without any reset.
#[test]
fn test_pause_resume_mid_session() {
    let mut session = build_session("pause", 31, 0);

    session.run(45, 30.0);
    let count_at_pause = session.engine().sample_count();
    assert!(count_at_pause > 0);

    session.set_active(false);
    for i in 45..105 {
        session.tick(i as f64 / 30.0);
    }
    assert_eq!(session.engine().sample_count(), count_at_pause);

    session.set_active(true);
    for i in 105..165 {
        session.tick(i as f64 / 30.0);
    }
    assert!(session.engine().sample_count() > count_at_pause);

    std::fs::remove_file(session.gate().store().path()).ok();
}

/// Reloading the persisted model after every admission yields the same
/// sample count and reprojection error as the in-memory model.
#[test]
fn test_model_roundtrip_after_each_admission() {
    let mut session = build_session("roundtrip", 47, 0);

    for i in 0..120 {
        let now = i as f64 / 30.0;
        if let Some(GateEvent::Tick { action, report, .. }) = session.tick(now) {
            if action.admitted() {
                let reloaded = session.gate().store().load().unwrap();
                assert_eq!(reloaded.sample_count(), report.sample_count);
                assert_eq!(reloaded.reprojection_error, report.reprojection_error);
                assert_eq!(reloaded.sample_errors, report.sample_errors);
            }
        }
    }

    std::fs::remove_file(session.gate().store().path()).ok();
}

/// An engine that keeps failing detection produces only rejected ticks and
/// never grows the sample set or writes a model file.
#[test]
fn test_pattern_never_found() {
    let config = AppConfig::default();
    let pattern = config.pattern.resolve().unwrap();
    let engine = ScriptedEngine::new(pattern).with_detection_script(&[false; 300]);
    let source = SyntheticCamera::new(FrameFormat::new(32, 24, 3), 7);
    let path = temp_model_path("never_found");
    let mut session = Session::new(&config, source, engine, ModelStore::new(&path));

    let events = session.run(150, 30.0);
    assert!(tick_actions(&events)
        .iter()
        .all(|(_, a)| matches!(a, Action::Skipped | Action::Rejected)));
    assert!(tick_actions(&events)
        .iter()
        .any(|(_, a)| matches!(a, Action::Rejected)));
    assert_eq!(session.engine().sample_count(), 0);
    assert!(!path.exists(), "no model may be written without an admission");
}

/// Long session with a low cleaning floor: cleaning fires only on
/// admission ticks once the sample set exceeds the floor.
#[test]
fn test_cleaning_only_after_floor_exceeded() {
    let mut config = AppConfig::default();
    config.gate = GateConfig {
        motion_threshold: 2.5,
        min_interval: 0.2,
        cleaning_floor: 3,
    };
    let pattern = PatternSettings::default().resolve().unwrap();
    let source = SyntheticCamera::new(FrameFormat::new(32, 24, 3), 91);
    let path = temp_model_path("floor");
    let mut session = Session::new(
        &config,
        source,
        ScriptedEngine::new(pattern),
        ModelStore::new(&path),
    );

    let events = session.run(120, 30.0);
    let mut admitted_so_far = 0usize;
    for (_, action) in tick_actions(&events) {
        match action {
            Action::Admitted => {
                admitted_so_far += 1;
                assert!(
                    admitted_so_far <= config.gate.cleaning_floor,
                    "admission {} past the floor must clean",
                    admitted_so_far
                );
            }
            Action::AdmittedAndCleaned => {
                admitted_so_far += 1;
                assert!(admitted_so_far > config.gate.cleaning_floor);
            }
            _ => {}
        }
    }
    assert!(admitted_so_far > config.gate.cleaning_floor);

    std::fs::remove_file(&path).ok();
}
