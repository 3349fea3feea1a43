use burn::{
    prelude::*,
    tensor::{backend::Backend, ElementConversion},
};

/// Scales an image to zero mean and unit variance.
///
/// The standard deviation is floored at `1 / sqrt(N)` so that flat images do
/// not blow up.
pub fn per_image_standardization<B: Backend>(image: Tensor<B, 2>) -> Tensor<B, 2> {
    let num_elements = image.shape().num_elements();
    let mean = image.clone().mean().into_scalar().elem::<f64>();

    let centered = image.sub_scalar(mean);
    let variance = centered
        .clone()
        .powf_scalar(2.0)
        .mean()
        .into_scalar()
        .elem::<f64>();
    let min_stddev = 1.0 / (num_elements as f64).sqrt();

    centered.div_scalar(variance.sqrt().max(min_stddev))
}

#[cfg(test)]
mod tests {
    use burn::tensor::TensorData;

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn output_has_zero_mean_and_unit_variance() {
        let device = Default::default();
        let image = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[0.0, 10.0, 20.0], [30.0, 40.0, 50.0]]),
            &device,
        );

        let standardized = per_image_standardization(image);
        let mean = standardized.clone().mean().into_scalar().elem::<f64>();
        let variance = standardized
            .powf_scalar(2.0)
            .mean()
            .into_scalar()
            .elem::<f64>();

        assert!(mean.abs() < 1e-5);
        assert!((variance - 1.0).abs() < 1e-4);
    }

    #[test]
    fn flat_image_becomes_zeros() {
        let device = Default::default();
        let image = Tensor::<TestBackend, 2>::full([4, 4], 7.0, &device);

        let values = per_image_standardization(image)
            .into_data()
            .to_vec::<f32>()
            .expect("float data");

        assert!(values.iter().all(|value| *value == 0.0));
    }
}
