// Gate error types and constants

use crate::error::ErrorCode;
use log::{error, warn};
use std::fmt;

/// Gate error code constants
///
/// Error code range: 2001-2002
pub struct GateErrorCodes {}

impl GateErrorCodes {
    /// Frame shape/format incompatible with the primed buffers
    pub const FORMAT_MISMATCH: i32 = 2001;

    /// Durable model write failed
    pub const PERSISTENCE: i32 = 2002;
}

/// Log a gate error with structured context
///
/// Format mismatches abort the tick and are logged as errors; persistence
/// failures are warn-and-continue since the in-memory model keeps the
/// admitted sample and the next admission cycle rewrites the file anyway.
pub fn log_gate_error(err: &GateError, context: &str) {
    match err {
        GateError::Persistence { .. } => warn!(
            "Gate warning in {}: code={}, component=SampleGate, message={}",
            context,
            err.code(),
            err.message()
        ),
        _ => error!(
            "Gate error in {}: code={}, component=SampleGate, message={}",
            context,
            err.code(),
            err.message()
        ),
    }
}

/// Per-tick gate errors
///
/// Engine rejection (pattern not found in an eligible frame) is the expected
/// common case and is deliberately NOT an error; it surfaces as the
/// `Rejected` action instead.
///
/// Error code range: 2001-2002
#[derive(Debug, Clone, PartialEq)]
pub enum GateError {
    /// Frame dimensions/format differ from the primed previous-frame buffer
    FormatMismatch { expected: String, actual: String },

    /// Durable model write failed; in-memory model retained
    Persistence { reason: String },
}

impl ErrorCode for GateError {
    fn code(&self) -> i32 {
        match self {
            GateError::FormatMismatch { .. } => GateErrorCodes::FORMAT_MISMATCH,
            GateError::Persistence { .. } => GateErrorCodes::PERSISTENCE,
        }
    }

    fn message(&self) -> String {
        match self {
            GateError::FormatMismatch { expected, actual } => {
                format!("Frame format mismatch: expected {}, got {}", expected, actual)
            }
            GateError::Persistence { reason } => {
                format!("Model persistence failed: {}", reason)
            }
        }
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GateError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for GateError {}
