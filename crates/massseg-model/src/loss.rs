//! Logistic loss restricted to the breast area.

use burn::{prelude::*, tensor::backend::Backend};
use massseg_metric::{MASS, OUTSIDE_BREAST};

/// Mean binary cross-entropy between logits and the mass class of a label.
///
/// Pixels labelled `255` are positives, pixels labelled `127` negatives and
/// pixels outside the breast area (`0`) are left out of the mean. Uses the
/// overflow-free form `max(x, 0) - x * z + ln(1 + exp(-|x|))`. A label
/// without any breast area yields a loss of zero.
///
/// # Panics
///
/// Panics if `logits` and `label` do not have the same shape.
pub fn logistic_loss<B: Backend>(logits: Tensor<B, 2>, label: Tensor<B, 2, Int>) -> Tensor<B, 1> {
    assert_eq!(
        logits.dims(),
        label.dims(),
        "Logits and label must have the same shape"
    );

    let targets = label.clone().equal_elem(MASS).float();
    let breast_area = label.not_equal_elem(OUTSIDE_BREAST).float();

    let per_pixel = logits.clone().clamp_min(0.0) - logits.clone() * targets
        + logits.abs().neg().exp().log1p();

    let total = (per_pixel * breast_area.clone()).sum();
    let count = breast_area.sum().clamp_min(1.0);

    total / count
}
