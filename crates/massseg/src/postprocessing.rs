//! Logits to three-class segmentation.

use burn::{prelude::*, tensor::backend::Backend};
use massseg_metric::{BREAST_TISSUE, MASS, OUTSIDE_BREAST};

use crate::error::{EvalError, EvalResult};

/// Builds a segmentation from logits, a label and a logit-space threshold.
///
/// Every pixel starts as breast tissue (`127`), pixels with
/// `logits >= threshold` become mass (`255`), and finally every pixel where the
/// label is `0` is set to `0`. The label's outside-breast mask always wins:
/// the background of the label comes from thresholding the raw image to zero,
/// which the model is not asked to learn.
///
/// # Errors
///
/// Returns [`EvalError::ShapeMismatch`] if `logits` and `label` differ in shape.
pub fn post<B: Backend>(
    logits: Tensor<B, 2>,
    label: Tensor<B, 2, Int>,
    threshold: f64,
) -> EvalResult<Tensor<B, 2, Int>> {
    let logits_dims = logits.dims();
    let label_dims = label.dims();
    if logits_dims != label_dims {
        return Err(EvalError::ShapeMismatch {
            logits: logits_dims,
            label: label_dims,
        });
    }

    let mass = logits.greater_equal_elem(threshold);
    let outside_breast = label.equal_elem(OUTSIDE_BREAST);

    let segmentation = Tensor::<B, 2, Int>::full(logits_dims, BREAST_TISSUE, &mass.device())
        .mask_fill(mass, MASS)
        .mask_fill(outside_breast, OUTSIDE_BREAST);

    Ok(segmentation)
}

#[cfg(test)]
mod tests {
    use burn::tensor::{ElementConversion, TensorData};

    use super::*;
    use crate::tests::TestBackend;

    fn values(tensor: Tensor<TestBackend, 2, Int>) -> Vec<i64> {
        tensor
            .into_data()
            .convert::<i64>()
            .to_vec::<i64>()
            .expect("int data")
    }

    #[test]
    fn thresholds_inside_breast_and_masks_outside() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[-1.0, 0.0, 1.0], [5.0, -5.0, 0.5]]),
            &device,
        );
        let label = Tensor::<TestBackend, 2, Int>::from_data(
            TensorData::from([[127, 255, 127], [0, 0, 255]]),
            &device,
        );

        let segmentation = post(logits, label, 0.0).expect("same shape");

        assert_eq!(values(segmentation), vec![127, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn output_only_contains_the_three_classes() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[-3.0, -1.5, 0.0, 1.5], [3.0, 0.2, -0.2, 9.0]]),
            &device,
        );
        let label = Tensor::<TestBackend, 2, Int>::from_data(
            TensorData::from([[0, 127, 255, 0], [127, 255, 0, 127]]),
            &device,
        );

        for threshold in [-10.0, -1.0, 0.0, 0.1, 2.0, 10.0] {
            let segmentation = post(logits.clone(), label.clone(), threshold).expect("same shape");
            assert!(values(segmentation)
                .into_iter()
                .all(|value| value == 0 || value == 127 || value == 255));
        }
    }

    #[test]
    fn outside_breast_wins_for_any_threshold() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::full([3, 3], 100.0, &device);
        let label = Tensor::<TestBackend, 2, Int>::zeros([3, 3], &device);

        for threshold in [f64::NEG_INFINITY, -100.0, 0.0, 100.0] {
            let segmentation = post(logits.clone(), label.clone(), threshold).expect("same shape");
            assert!(values(segmentation).into_iter().all(|value| value == 0));
        }
    }

    #[test]
    fn mass_count_does_not_grow_with_threshold() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[-2.0, -1.0, 0.0, 1.0, 2.0], [3.0, -3.0, 0.5, -0.5, 1.5]]),
            &device,
        );
        let label = Tensor::<TestBackend, 2, Int>::full([2, 5], 127, &device);

        let mut previous = usize::MAX;
        for threshold in [-4.0, -2.0, -0.5, 0.0, 0.5, 1.0, 2.5, 4.0] {
            let segmentation = post(logits.clone(), label.clone(), threshold).expect("same shape");
            let mass_pixels = segmentation
                .equal_elem(255)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>() as usize;

            assert!(mass_pixels <= previous);
            previous = mass_pixels;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::zeros([2, 3], &device);
        let label = Tensor::<TestBackend, 2, Int>::zeros([3, 2], &device);

        let result = post(logits, label, 0.0);

        assert!(matches!(
            result,
            Err(EvalError::ShapeMismatch {
                logits: [2, 3],
                label: [3, 2]
            })
        ));
    }
}
