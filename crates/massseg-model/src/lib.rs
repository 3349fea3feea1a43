//! Model side of the mass segmentation evaluator.
//!
//! The evaluator only talks to a [`SegmentationModel`]: something that maps a
//! single-channel image to per-pixel logits and can score those logits with a
//! logistic loss. [`MassNet`] is the bundled fully convolutional network,
//! restored from a Burn checkpoint.

pub mod adapter;
pub mod checkpoint;
pub mod error;
pub mod loss;
pub mod model;
pub mod standardization;

pub use adapter::SegmentationModel;
pub use checkpoint::{latest_checkpoint, resolve_checkpoint, CHECKPOINT_EXTENSION};
pub use error::{ModelError, ModelResult};
pub use loss::logistic_loss;
pub use model::{MassNet, MassNetConfig, MassNetRecord};
pub use standardization::per_image_standardization;
