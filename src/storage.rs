//! Durable calibration model storage
//!
//! The model file is always a complete snapshot: writes go to a temporary
//! file in the same directory and are renamed into place, so a reader never
//! observes a partially written model. The file is never read back mid-run;
//! the next successful admission cycle simply overwrites it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::CalibrationModel;
use crate::error::GateError;

/// Writes and reads the persisted calibration model
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a complete model snapshot
    ///
    /// # Returns
    /// * `Ok(())` - Snapshot durable at `path`
    /// * `Err(GateError::Persistence)` - Write or rename failed; any partial
    ///   temp file is left behind, the target file is untouched
    pub fn save(&self, model: &CalibrationModel) -> Result<(), GateError> {
        let json = serde_json::to_string_pretty(model).map_err(|err| GateError::Persistence {
            reason: format!("serialize model: {}", err),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|err| GateError::Persistence {
            reason: format!("write {}: {}", tmp_path.display(), err),
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|err| GateError::Persistence {
            reason: format!("rename into {}: {}", self.path.display(), err),
        })?;

        log::debug!(
            "[Storage] Persisted model with {} samples to {}",
            model.sample_count(),
            self.path.display()
        );
        Ok(())
    }

    /// Load the persisted model snapshot
    ///
    /// # Returns
    /// * `Ok(CalibrationModel)` - Parsed snapshot
    /// * `Err(GateError::Persistence)` - File missing or unparsable
    pub fn load(&self) -> Result<CalibrationModel, GateError> {
        let contents = fs::read_to_string(&self.path).map_err(|err| GateError::Persistence {
            reason: format!("read {}: {}", self.path.display(), err),
        })?;
        serde_json::from_str(&contents).map_err(|err| GateError::Persistence {
            reason: format!("parse {}: {}", self.path.display(), err),
        })
    }
}
