// Error types for the auto-calibration engine
//
// This module defines custom error types for startup configuration and
// per-tick gate operations, providing structured error handling with
// numeric error codes suitable for log scraping and monitoring.

mod config;
mod gate;

pub use config::{log_config_error, ConfigError, ConfigErrorCodes};
pub use gate::{log_gate_error, GateError, GateErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// log output and CLI exit paths.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
