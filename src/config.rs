//! Configuration management for the auto-calibration session
//!
//! This module provides startup settings loading from a JSON file. The
//! settings file is optional: when it is missing or unreadable the built-in
//! defaults apply (matching the behavior of running without a settings
//! file). A settings file that is present but carries invalid pattern
//! values aborts startup with a `ConfigError`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Complete session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub pattern: PatternSettings,
}

/// Gate admission thresholds, fixed at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Maximum motion score at which the scene still counts as "still"
    /// (comparison is strict: a score equal to this rejects the frame)
    pub motion_threshold: f64,
    /// Minimum seconds between accepted samples (strict comparison)
    pub min_interval: f64,
    /// Sample-set size above which outlier cleaning runs after each
    /// recalibration
    pub cleaning_floor: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            motion_threshold: 2.5,
            min_interval: 1.0,
            cleaning_floor: 10,
        }
    }
}

/// Raw calibration-pattern settings as they appear in the settings file
///
/// The pattern type travels as a numeric tag at the file boundary and is
/// resolved into the closed [`PatternType`] enum by [`PatternSettings::resolve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSettings {
    /// Inner corners / circles along the horizontal axis
    pub x_count: i64,
    /// Inner corners / circles along the vertical axis
    pub y_count: i64,
    /// Physical edge length of one pattern square (arbitrary unit)
    pub square_size: f64,
    /// Numeric pattern tag: 0 = checkerboard, 1 = circles grid,
    /// 2 = asymmetric circles grid
    pub pattern_type: i64,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            x_count: 10,
            y_count: 7,
            square_size: 2.5,
            pattern_type: 0,
        }
    }
}

/// Calibration pattern variants understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Checkerboard,
    CirclesGrid,
    AsymmetricCirclesGrid,
}

impl PatternType {
    /// Resolve the numeric settings-file tag into a pattern variant
    ///
    /// # Returns
    /// * `Ok(PatternType)` - Known tag (0, 1 or 2)
    /// * `Err(ConfigError)` - Any other tag
    pub fn from_tag(tag: i64) -> Result<Self, ConfigError> {
        match tag {
            0 => Ok(PatternType::Checkerboard),
            1 => Ok(PatternType::CirclesGrid),
            2 => Ok(PatternType::AsymmetricCirclesGrid),
            other => Err(ConfigError::UnknownPatternType { value: other }),
        }
    }

    /// Numeric tag used in the settings file
    pub fn tag(&self) -> i64 {
        match self {
            PatternType::Checkerboard => 0,
            PatternType::CirclesGrid => 1,
            PatternType::AsymmetricCirclesGrid => 2,
        }
    }

    /// Get human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            PatternType::Checkerboard => "CHECKERBOARD",
            PatternType::CirclesGrid => "CIRCLES GRID",
            PatternType::AsymmetricCirclesGrid => "ASYMMETRIC CIRCLES GRID",
        }
    }
}

/// Validated pattern geometry handed to the calibration engine
#[derive(Debug, Clone, PartialEq)]
pub struct PatternConfig {
    pub x_count: u32,
    pub y_count: u32,
    pub square_size: f64,
    pub pattern_type: PatternType,
}

impl PatternSettings {
    /// Validate the raw settings and resolve them into a [`PatternConfig`]
    ///
    /// # Returns
    /// * `Ok(PatternConfig)` - All values in range
    /// * `Err(ConfigError)` - Geometry below 2 per axis, non-positive square
    ///   size, or unknown pattern tag
    pub fn resolve(&self) -> Result<PatternConfig, ConfigError> {
        if self.x_count < 2 || self.y_count < 2 {
            return Err(ConfigError::InvalidGeometry {
                x_count: self.x_count,
                y_count: self.y_count,
            });
        }

        if self.square_size <= 0.0 {
            return Err(ConfigError::InvalidSquareSize {
                value: self.square_size,
            });
        }

        Ok(PatternConfig {
            x_count: self.x_count as u32,
            y_count: self.y_count as u32,
            square_size: self.square_size,
            pattern_type: PatternType::from_tag(self.pattern_type)?,
        })
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if the settings file is absent)
    fn default() -> Self {
        Self {
            gate: GateConfig::default(),
            pattern: PatternSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON settings file
    ///
    /// A missing or unreadable file is not fatal: the defaults apply, with a
    /// warning. A file that parses but fails pattern validation aborts
    /// startup with a `ConfigError`.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON settings file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` - Loaded (or defaulted) configuration
    /// * `Err(ConfigError)` - Settings present but invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded settings from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Settings file {:?} not readable: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        };

        // Fatal at startup: present-but-invalid pattern values must not
        // silently fall back to defaults.
        config.pattern.resolve()?;

        Ok(config)
    }
}
