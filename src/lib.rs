// Autocalib Core - stability-gated camera auto-calibration
// Per-frame admission policy with incremental model refinement

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod gate;
pub mod relay;
pub mod session;
pub mod source;
pub mod storage;
pub mod telemetry;

// Re-exports for convenience
pub use config::AppConfig;
pub use gate::{Action, SampleGate};
pub use session::Session;

/// Initialize logging for binaries
///
/// Honors `RUST_LOG`; defaults to `info` when unset.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
