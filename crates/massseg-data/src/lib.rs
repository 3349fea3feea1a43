//! Validation data for the mass segmentation evaluator.
//!
//! A [`Manifest`] lists `(image, label)` path pairs read from a header-less
//! CSV file. An [`ExampleLoader`] turns a manifest entry into tensors;
//! [`ImageFileLoader`] does so by decoding files below a data directory.

pub mod error;
pub mod loader;
pub mod manifest;

pub use error::{DatasetError, DatasetResult};
pub use loader::{Example, ExampleLoader, ImageFileLoader};
pub use manifest::{Manifest, ManifestEntry};

#[cfg(test)]
mod tests {
    pub type TestBackend = burn::backend::NdArray;
}
