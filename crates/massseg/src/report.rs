//! Evaluation results and their text layout.
//!
//! The text form is line oriented so that a redirected report can be parsed
//! back later:
//!
//! ```text
//! Threshold 0: -4.59511985013459 (0.01)
//! IOU: 0.0412
//! F1-score: 0.0791
//! ...
//! Recall: 0.9987
//!
//! Logistic loss: 0.2153
//! ```

use core::fmt;

use massseg_metric::MetricVector;
use serde::Serialize;

/// Mean metrics over the validation set for one threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdReport {
    /// Position in the sweep.
    pub index: usize,
    /// Threshold in logit space.
    pub threshold: f64,
    /// The same threshold as a probability.
    pub probability: f64,
    /// Mean metric vector.
    pub metrics: MetricVector,
}

impl fmt::Display for ThresholdReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Threshold {}: {} ({})",
            self.index, self.threshold, self.probability
        )?;
        write!(f, "{}", self.metrics)
    }
}

/// Complete result of a threshold sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Number of validation examples in every pass.
    pub examples: usize,
    /// One entry per threshold, in sweep order.
    pub thresholds: Vec<ThresholdReport>,
    /// Mean logistic loss, independent of the threshold.
    pub logistic_loss: f64,
}

impl EvaluationReport {
    /// The threshold with the highest mean IOU, if any.
    pub fn best_by_iou(&self) -> Option<&ThresholdReport> {
        self.thresholds
            .iter()
            .max_by(|a, b| a.metrics.iou.total_cmp(&b.metrics.iou))
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.thresholds {
            writeln!(f, "{report}")?;
        }
        write!(f, "{}", LossLine(self.logistic_loss))
    }
}

/// The closing `Logistic loss: x` line.
pub struct LossLine(pub f64);

impl fmt::Display for LossLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Logistic loss: {}", self.0)
    }
}
