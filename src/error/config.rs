// Configuration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Configuration error code constants
///
/// These constants provide a single source of truth for startup error
/// codes so that CLI wrappers and log consumers agree on their meaning.
///
/// Error code range: 1001-1003
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    /// Pattern type tag outside the known enumeration
    pub const UNKNOWN_PATTERN_TYPE: i32 = 1001;

    /// Pattern geometry counts below the minimum
    pub const INVALID_GEOMETRY: i32 = 1002;

    /// Non-positive physical square size
    pub const INVALID_SQUARE_SIZE: i32 = 1003;
}

/// Log a configuration error with structured context
///
/// Configuration errors are fatal at startup; this helper records the
/// numeric code and the settings field that failed validation before the
/// caller aborts initialization.
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        "Config error in {}: code={}, component=Settings, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Startup configuration errors
///
/// These errors cover validation of the optional settings file. A missing
/// settings file is not an error (defaults apply); a present but invalid
/// one aborts startup.
///
/// Error code range: 1001-1003
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Pattern type tag outside the known 0/1/2 enumeration
    UnknownPatternType { value: i64 },

    /// Pattern geometry counts below the minimum of 2 per axis
    InvalidGeometry { x_count: i64, y_count: i64 },

    /// Non-positive physical square size
    InvalidSquareSize { value: f64 },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::UnknownPatternType { .. } => ConfigErrorCodes::UNKNOWN_PATTERN_TYPE,
            ConfigError::InvalidGeometry { .. } => ConfigErrorCodes::INVALID_GEOMETRY,
            ConfigError::InvalidSquareSize { .. } => ConfigErrorCodes::INVALID_SQUARE_SIZE,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::UnknownPatternType { value } => {
                format!("Unknown pattern type tag: {} (expected 0, 1 or 2)", value)
            }
            ConfigError::InvalidGeometry { x_count, y_count } => {
                format!(
                    "Invalid pattern geometry: {}x{} (each axis needs at least 2)",
                    x_count, y_count
                )
            }
            ConfigError::InvalidSquareSize { value } => {
                format!("Invalid square size: {} (must be positive)", value)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}
