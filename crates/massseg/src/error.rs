use std::path::PathBuf;

use massseg_data::DatasetError;
use massseg_model::ModelError;
use thiserror::Error;

/// The error type for evaluation runs.
///
/// Every variant is fatal: an evaluation either completes over the whole
/// manifest or is abandoned.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The run configuration is unusable.
    #[error("Invalid evaluation configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("Failed to load configuration {path}: {reason}")]
    ConfigLoadFailed {
        /// The configuration file.
        path: PathBuf,
        /// The loader's error message.
        reason: String,
    },

    /// Logits and label disagree in shape.
    #[error("Shape mismatch: logits are {logits:?} but label is {label:?}")]
    ShapeMismatch {
        /// `[height, width]` of the logits.
        logits: [usize; 2],
        /// `[height, width]` of the label.
        label: [usize; 2],
    },

    /// Manifest or example loading failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Model construction or checkpoint restore failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A specialized `Result` type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;
