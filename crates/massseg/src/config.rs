//! Evaluation configuration.

use std::path::Path;

use burn::config::Config;
use massseg_model::MassNetConfig;

use crate::error::{EvalError, EvalResult};

/// Everything an evaluation run needs.
///
/// Stored as JSON; omitted fields take their defaults.
#[derive(Config, Debug)]
pub struct EvaluationConfig {
    /// Checkpoint file, or a directory holding checkpoints.
    #[config(default = "String::from(\"checkpoint\")")]
    pub checkpoint: String,

    /// CSV manifest of `image,label` rows.
    #[config(default = "String::from(\"val/val.csv\")")]
    pub manifest_path: String,

    /// Directory the manifest paths are relative to.
    #[config(default = "String::from(\"val/\")")]
    pub data_dir: String,

    #[config(default = 20)]
    pub number_of_thresholds: usize,

    /// Seed for choosing the example thresholds are derived from.
    pub seed: Option<u64>,

    /// Architecture of the restored network.
    #[config(default = "MassNetConfig::new()")]
    pub model: MassNetConfig,
}

impl EvaluationConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ConfigLoadFailed`] if the file cannot be read or
    /// parsed.
    pub fn from_file(path: impl AsRef<Path>) -> EvalResult<Self> {
        let path = path.as_ref();
        <Self as Config>::load(path).map_err(|e| EvalError::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Checks the configuration before any model or data is touched.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidConfiguration`] for a zero threshold count,
    /// a manifest that is not a file or a data directory that is not a
    /// directory.
    pub fn validate(&self) -> EvalResult<()> {
        if self.number_of_thresholds == 0 {
            return Err(EvalError::InvalidConfiguration {
                reason: "number_of_thresholds must be at least 1".to_owned(),
            });
        }
        if !Path::new(&self.manifest_path).is_file() {
            return Err(EvalError::InvalidConfiguration {
                reason: format!("manifest not found: {}", self.manifest_path),
            });
        }
        if !Path::new(&self.data_dir).is_dir() {
            return Err(EvalError::InvalidConfiguration {
                reason: format!("data directory not found: {}", self.data_dir),
            });
        }

        Ok(())
    }
}
