//! Confusion matrix over the breast area and the metrics derived from it.
//!
//! Counts are taken with plain equality comparisons. Pixels outside the
//! breast area carry the value `0` in the segmentation, so they match neither
//! the mass nor the tissue predicate and drop out of every count.

use burn::{
    prelude::*,
    tensor::{backend::Backend, ElementConversion, Tensor},
};
use serde::Serialize;

use crate::{
    labels::{BREAST_TISSUE, MASS},
    vector::MetricVector,
};

/// Added to every denominator so that empty classes never divide by zero.
pub const EPSILON: f64 = 1e-7;

/// Pixel counts for the mass (positive) and tissue (negative) classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positive: u64,
    pub false_positive: u64,
    pub true_negative: u64,
    pub false_negative: u64,
}

impl ConfusionMatrix {
    /// Counts a segmentation against its ground-truth label.
    ///
    /// # Panics
    ///
    /// Panics if the two masks do not have the same shape.
    pub fn from_masks<B: Backend>(
        segmentation: Tensor<B, 2, Int>,
        label: Tensor<B, 2, Int>,
    ) -> Self {
        assert_eq!(
            segmentation.dims(),
            label.dims(),
            "Segmentation and label must have the same shape"
        );

        let predicted_mass = segmentation.clone().equal_elem(MASS).int();
        let predicted_tissue = segmentation.equal_elem(BREAST_TISSUE).int();
        let actual_mass = label.clone().equal_elem(MASS).int();
        let not_mass = label.clone().not_equal_elem(MASS).int();
        let actual_tissue = label.clone().equal_elem(BREAST_TISSUE).int();
        let not_tissue = label.not_equal_elem(BREAST_TISSUE).int();

        Self {
            true_positive: count(predicted_mass.clone() * actual_mass),
            false_positive: count(predicted_mass * not_mass),
            true_negative: count(predicted_tissue.clone() * actual_tissue),
            false_negative: count(predicted_tissue * not_tissue),
        }
    }

    pub fn accuracy(&self) -> f64 {
        let (tp, fp, tn, fn_) = self.as_f64();
        (tp + tn) / (tp + tn + fp + fn_ + EPSILON)
    }

    pub fn sensitivity(&self) -> f64 {
        let (tp, _, _, fn_) = self.as_f64();
        tp / (tp + fn_ + EPSILON)
    }

    pub fn specificity(&self) -> f64 {
        let (_, fp, tn, _) = self.as_f64();
        tn / (fp + tn + EPSILON)
    }

    pub fn precision(&self) -> f64 {
        let (tp, fp, _, _) = self.as_f64();
        tp / (tp + fp + EPSILON)
    }

    /// Same quantity as [`ConfusionMatrix::sensitivity`].
    pub fn recall(&self) -> f64 {
        self.sensitivity()
    }

    pub fn iou(&self) -> f64 {
        let (tp, fp, _, fn_) = self.as_f64();
        tp / (tp + fp + fn_ + EPSILON)
    }

    pub fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        (2.0 * precision * recall) / (precision + recall + EPSILON)
    }

    /// Geometric mean of sensitivity and specificity.
    pub fn g_mean(&self) -> f64 {
        (self.sensitivity() * self.specificity()).sqrt()
    }

    pub fn metric_vector(&self) -> MetricVector {
        MetricVector {
            iou: self.iou(),
            f1: self.f1(),
            g_mean: self.g_mean(),
            accuracy: self.accuracy(),
            sensitivity: self.sensitivity(),
            specificity: self.specificity(),
            precision: self.precision(),
            recall: self.recall(),
        }
    }

    fn as_f64(&self) -> (f64, f64, f64, f64) {
        (
            self.true_positive as f64,
            self.false_positive as f64,
            self.true_negative as f64,
            self.false_negative as f64,
        )
    }
}

/// Computes the metric vector of a segmentation against its label.
///
/// # Panics
///
/// Panics if the two masks do not have the same shape.
pub fn calculate_metrics<B: Backend>(
    segmentation: Tensor<B, 2, Int>,
    label: Tensor<B, 2, Int>,
) -> MetricVector {
    ConfusionMatrix::from_masks(segmentation, label).metric_vector()
}

fn count<B: Backend>(indicator: Tensor<B, 2, Int>) -> u64 {
    indicator.sum().into_scalar().elem::<i64>() as u64
}
