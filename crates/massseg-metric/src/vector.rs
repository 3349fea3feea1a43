//! Fixed-order vector of the eight reported segmentation metrics.

use core::{
    fmt,
    ops::{Add, AddAssign, Div},
};

use serde::Serialize;

/// Display names, in the same order as [`MetricVector::to_array`].
pub const METRIC_NAMES: [&str; 8] = [
    "IOU",
    "F1-score",
    "G-mean",
    "Accuracy",
    "Sensitivity",
    "Specificity",
    "Precision",
    "Recall",
];

/// Per-example (or averaged) segmentation metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricVector {
    pub iou: f64,
    pub f1: f64,
    pub g_mean: f64,
    pub accuracy: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub precision: f64,
    pub recall: f64,
}

impl MetricVector {
    /// Builds a vector from values ordered like [`METRIC_NAMES`].
    pub const fn from_array(values: [f64; 8]) -> Self {
        let [iou, f1, g_mean, accuracy, sensitivity, specificity, precision, recall] = values;
        Self {
            iou,
            f1,
            g_mean,
            accuracy,
            sensitivity,
            specificity,
            precision,
            recall,
        }
    }

    /// Values ordered like [`METRIC_NAMES`].
    pub const fn to_array(&self) -> [f64; 8] {
        [
            self.iou,
            self.f1,
            self.g_mean,
            self.accuracy,
            self.sensitivity,
            self.specificity,
            self.precision,
            self.recall,
        ]
    }

    /// Pairs every metric value with its display name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        METRIC_NAMES.into_iter().zip(self.to_array())
    }

    /// Returns `true` when no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }
}

impl Add for MetricVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let lhs = self.to_array();
        let rhs = rhs.to_array();
        Self::from_array(core::array::from_fn(|i| lhs[i] + rhs[i]))
    }
}

impl AddAssign for MetricVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Div<f64> for MetricVector {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::from_array(self.to_array().map(|value| value / rhs))
    }
}

impl fmt::Display for MetricVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.named() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
