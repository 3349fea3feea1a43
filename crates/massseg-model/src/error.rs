use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or restoring a segmentation model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The network configuration is logically inconsistent.
    #[error("Invalid model configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// No checkpoint exists at the given location.
    #[error("No checkpoint found at: {path}")]
    CheckpointNotFound {
        /// The file or directory that was searched.
        path: PathBuf,
    },

    /// The file is not a Burn `.mpk` record.
    #[error("Not a checkpoint record (expected a .mpk file): {path}")]
    UnsupportedCheckpointFormat {
        /// The rejected file.
        path: PathBuf,
    },

    /// The checkpoint directory could not be listed.
    #[error("Failed to read checkpoint directory: {path}")]
    CheckpointDirectoryReadFailed {
        /// The directory that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The checkpoint exists but its record could not be loaded.
    #[error("Failed to load checkpoint {path}: {reason}")]
    CheckpointLoadFailed {
        /// The checkpoint file.
        path: PathBuf,
        /// The recorder's error message.
        reason: String,
    },
}

/// A specialized `Result` type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
