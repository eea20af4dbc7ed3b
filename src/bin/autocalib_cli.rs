use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use autocalib::config::AppConfig;
use autocalib::engine::{CalibrationEngine, ScriptedEngine};
use autocalib::error::ErrorCode;
use autocalib::frame::FrameFormat;
use autocalib::session::Session;
use autocalib::source::SyntheticCamera;
use autocalib::storage::ModelStore;
use autocalib::telemetry::GateEvent;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "autocalib_cli",
    about = "Deterministic auto-calibration session harness"
)]
struct Cli {
    /// Optional JSON settings file (pattern geometry and gate thresholds)
    #[arg(long)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a synthetic-camera session and stream tick events to stdout
    Run {
        /// Where to persist the refined model
        #[arg(long, default_value = "calibration.json")]
        model: PathBuf,
        #[arg(long, default_value_t = 300)]
        ticks: usize,
        #[arg(long, default_value_t = 30.0)]
        fps: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Shake the synthetic scene every N frames (0 = never)
        #[arg(long, default_value_t = 45)]
        shake_every: usize,
        /// Pause auto-capture at this tick (demos the spacebar toggle)
        #[arg(long)]
        pause_at: Option<usize>,
        /// Resume auto-capture at this tick
        #[arg(long)]
        resume_at: Option<usize>,
        /// Only print admissions and failures, not every tick
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Print a persisted calibration model
    ShowModel {
        #[arg(long, default_value = "calibration.json")]
        model: PathBuf,
    },
}

fn main() -> ExitCode {
    autocalib::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.settings {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Run {
            model,
            ticks,
            fps,
            seed,
            shake_every,
            pause_at,
            resume_at,
            quiet,
        } => run_session(
            &config, model, ticks, fps, seed, shake_every, pause_at, resume_at, quiet,
        ),
        Commands::ShowModel { model } => show_model(&model),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_session(
    config: &AppConfig,
    model: PathBuf,
    ticks: usize,
    fps: f64,
    seed: u64,
    shake_every: usize,
    pause_at: Option<usize>,
    resume_at: Option<usize>,
    quiet: bool,
) -> Result<ExitCode> {
    let pattern = config.pattern.resolve()?;
    log::info!(
        "Session: {} pattern, {}x{} squares of {}",
        pattern.pattern_type.display_name(),
        pattern.x_count,
        pattern.y_count,
        pattern.square_size
    );

    let source =
        SyntheticCamera::new(FrameFormat::new(64, 48, 3), seed).with_shake_every(shake_every);
    let engine = ScriptedEngine::new(pattern);
    let store = ModelStore::new(model);
    let mut session = Session::new(config, source, engine, store);

    let mut admissions = 0usize;
    for i in 0..ticks {
        if pause_at == Some(i) {
            emit(&session.set_active(false))?;
        }
        if resume_at == Some(i) {
            emit(&session.set_active(true))?;
        }

        let now = i as f64 / fps;
        let Some(event) = session.tick(now) else {
            continue;
        };

        let admitted = matches!(&event, GateEvent::Tick { action, .. } if action.admitted());
        if admitted {
            admissions += 1;
        }
        let interesting = admitted || !matches!(&event, GateEvent::Tick { .. });
        if !quiet || interesting {
            emit(&event)?;
        }
        if let Some(err) = session.gate_mut().take_persist_error() {
            emit(&GateEvent::PersistFailed {
                context: err.message(),
            })?;
        }
    }

    println!(
        "Session done: {} ticks, {} admissions, {} samples, reproj error {:.4}",
        ticks,
        admissions,
        session.engine().sample_count(),
        session.gate().report(session.engine()).reprojection_error
    );
    Ok(ExitCode::from(0))
}

fn show_model(path: &PathBuf) -> Result<ExitCode> {
    let store = ModelStore::new(path);
    let model = store
        .load()
        .with_context(|| format!("loading model from {}", path.display()))?;

    println!("{}", serde_json::to_string_pretty(&model)?);
    println!(
        "samples: {}, reproj error: {:.4}, fov: {:.1} deg",
        model.sample_count(),
        model.reprojection_error,
        model.diagonal_fov
    );
    Ok(ExitCode::from(0))
}

fn emit(event: &GateEvent) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
