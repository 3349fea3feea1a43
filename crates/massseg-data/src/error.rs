//! Error types for manifest parsing and example loading.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for dataset operations.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The manifest file could not be opened.
    #[error("Failed to read manifest: {path}")]
    ManifestReadFailed {
        /// The manifest path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid CSV.
    #[error("Failed to parse manifest: {source}")]
    ManifestParseFailed {
        /// The CSV error, including its position.
        #[from]
        source: csv::Error,
    },

    /// A manifest row does not name both an image and a label.
    #[error("Manifest line {line} has {fields} field(s), expected image and label paths")]
    MalformedRow {
        /// 1-based line number of the row.
        line: u64,
        /// Number of fields found.
        fields: usize,
    },

    /// The manifest has no rows.
    #[error("Manifest contains no examples")]
    EmptyManifest,

    /// The data directory does not exist.
    #[error("Data directory not found: {path}")]
    DataDirectoryNotFound {
        /// The expected data directory.
        path: PathBuf,
    },

    /// An image or label file could not be opened or decoded.
    #[error("Failed to open image: {path}")]
    ImageOpenFailed {
        /// The image file path that failed to open.
        path: PathBuf,
        /// The underlying image processing error.
        #[source]
        source: image::ImageError,
    },

    /// A label contains a pixel value other than 0, 127 or 255.
    #[error("Label {path} contains invalid pixel value {value} (expected 0, 127 or 255)")]
    InvalidLabelValue {
        /// The label file.
        path: PathBuf,
        /// The first offending value.
        value: u8,
    },

    /// An image and its label differ in size.
    #[error(
        "Dimension mismatch between {image} ({image_height}x{image_width}) and {label} ({label_height}x{label_width})"
    )]
    DimensionMismatch {
        image: PathBuf,
        image_height: usize,
        image_width: usize,
        label: PathBuf,
        label_height: usize,
        label_width: usize,
    },
}

/// A specialized `Result` type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;
