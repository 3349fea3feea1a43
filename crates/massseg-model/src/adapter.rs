//! The capability the evaluator needs from a trained model.

use burn::{prelude::*, tensor::backend::Backend};

use crate::loss::logistic_loss;

/// A binary segmentation model seen as a black box.
///
/// Implementations must return logits with exactly the spatial shape of the
/// input image. Evaluation code never inspects anything beyond these two
/// operations, so tests can substitute a deterministic fake.
pub trait SegmentationModel<B: Backend> {
    /// Per-pixel logits for a single-channel `[height, width]` image.
    fn predict(&self, image: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Logistic loss of the model's prediction against a three-valued label.
    ///
    /// Returns a single-element tensor.
    fn loss(&self, image: Tensor<B, 2>, label: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        logistic_loss(self.predict(image), label)
    }
}
