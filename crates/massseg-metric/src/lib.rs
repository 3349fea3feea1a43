//! # Mass Segmentation Metrics
//!
//! Confusion-matrix based evaluation metrics for three-class breast mass
//! segmentations, implemented with the Burn tensor API.
//!
//! Labels and segmentations share the same pixel alphabet:
//!
//! - `0`: outside the breast area (ignored)
//! - `127`: breast tissue (background class)
//! - `255`: mass (foreground class)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use massseg_metric::{calculate_metrics, MetricsAggregator};
//!
//! let mut aggregator = MetricsAggregator::new();
//! aggregator.update(calculate_metrics(segmentation, label));
//! println!("{}", aggregator.mean());
//! ```

pub mod aggregator;
pub mod confusion;
pub mod labels;
pub mod vector;

pub use aggregator::MetricsAggregator;
pub use confusion::{calculate_metrics, ConfusionMatrix, EPSILON};
pub use labels::{is_admissible, BREAST_TISSUE, MASS, OUTSIDE_BREAST};
pub use vector::{MetricVector, METRIC_NAMES};
