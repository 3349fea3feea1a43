//! Candidate thresholds derived from the logit range of one example.
//!
//! Probabilities are spaced linearly between the smallest and the largest
//! predicted probability of a randomly chosen example, then mapped back to
//! logit space so they can be compared against raw logits.

use burn::tensor::{backend::Backend, ElementConversion, Tensor};
use massseg_data::{ExampleLoader, Manifest};
use massseg_model::SegmentationModel;
use rand::Rng;
use serde::Serialize;

use crate::error::EvalResult;

/// Logistic function.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Inverse of [`sigmoid`]: `ln(p) - ln(1 - p)`.
///
/// Saturated probabilities map to infinite logits.
pub fn logit(p: f64) -> f64 {
    p.ln() - (1.0 - p).ln()
}

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// A single value is `start`; zero values yield an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// Parallel, non-decreasing sequences of probabilities and logit thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSweep {
    pub probabilities: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl ThresholdSweep {
    /// Spaces `n` thresholds over the probability range spanned by two logits.
    ///
    /// Equal logits collapse every threshold to the same value.
    pub fn from_logit_range(min_logit: f64, max_logit: f64, n: usize) -> Self {
        let probabilities = linspace(sigmoid(min_logit), sigmoid(max_logit), n);
        let thresholds = probabilities.iter().copied().map(logit).collect();

        Self {
            probabilities,
            thresholds,
        }
    }

    /// Derives `n` thresholds from the predictions on one random manifest entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen image cannot be loaded.
    pub fn sample<B, M, L, R>(
        model: &M,
        loader: &L,
        manifest: &Manifest,
        n: usize,
        rng: &mut R,
        device: &B::Device,
    ) -> EvalResult<Self>
    where
        B: Backend,
        M: SegmentationModel<B>,
        L: ExampleLoader<B>,
        R: Rng + ?Sized,
    {
        let entry = manifest.choose(rng);
        let image = loader.load_image(entry, device)?;
        let logits = model.predict(image);
        let (min_logit, max_logit) = logit_range(logits);

        let sweep = Self::from_logit_range(min_logit, max_logit, n);
        tracing::info!(
            example = %entry.image.display(),
            min_probability = sigmoid(min_logit),
            max_probability = sigmoid(max_logit),
            count = n,
            "sampled thresholds"
        );
        Ok(sweep)
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// `(index, threshold, probability)` triples in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.thresholds
            .iter()
            .zip(&self.probabilities)
            .enumerate()
            .map(|(index, (&threshold, &probability))| (index, threshold, probability))
    }
}

fn logit_range<B: Backend>(logits: Tensor<B, 2>) -> (f64, f64) {
    let min = logits.clone().min().into_scalar().elem::<f64>();
    let max = logits.max().into_scalar().elem::<f64>();
    (min, max)
}
