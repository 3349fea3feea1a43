//! MassNet: a small fully convolutional network producing per-pixel mass logits.

use std::path::Path;

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        PaddingConfig2d, Relu,
    },
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder},
    tensor::backend::Backend,
};

use crate::{
    adapter::SegmentationModel,
    checkpoint::resolve_checkpoint,
    error::{ModelError, ModelResult},
    standardization::per_image_standardization,
};

/// Configuration for [`MassNet`].
#[derive(Config, Debug)]
pub struct MassNetConfig {
    /// Feature channels of every hidden convolution.
    #[config(default = 32)]
    pub hidden_channels: usize,
    /// Number of hidden convolutions before the logit head.
    #[config(default = 4)]
    pub num_layers: usize,
    /// Square kernel size of the hidden convolutions. Must be odd.
    #[config(default = 3)]
    pub kernel_size: usize,
}

impl MassNetConfig {
    /// Initialize a new model with random weights.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfiguration`] for zero layers or
    /// channels, or an even kernel size.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<MassNet<B>> {
        self.validate()?;

        let layers = (0..self.num_layers)
            .map(|index| {
                let in_channels = if index == 0 { 1 } else { self.hidden_channels };
                Conv2dConfig::new(
                    [in_channels, self.hidden_channels],
                    [self.kernel_size, self.kernel_size],
                )
                .with_padding(PaddingConfig2d::Same)
                .init(device)
            })
            .collect();

        let head = Conv2dConfig::new([self.hidden_channels, 1], [1, 1]).init(device);

        Ok(MassNet {
            layers,
            head,
            activation: Relu::new(),
        })
    }

    fn validate(&self) -> ModelResult<()> {
        if self.num_layers == 0 {
            return Err(ModelError::InvalidConfiguration {
                reason: "num_layers must be at least 1".to_owned(),
            });
        }
        if self.hidden_channels == 0 {
            return Err(ModelError::InvalidConfiguration {
                reason: "hidden_channels must be at least 1".to_owned(),
            });
        }
        if self.kernel_size % 2 == 0 {
            return Err(ModelError::InvalidConfiguration {
                reason: format!("kernel_size must be odd, got {}", self.kernel_size),
            });
        }
        Ok(())
    }
}

/// Fully convolutional mass segmentation network.
///
/// Input is a `[batch, 1, height, width]` image, output the logits of the
/// mass class with the same spatial shape.
#[derive(Module, Debug)]
pub struct MassNet<B: Backend> {
    layers: Vec<Conv2d<B>>,
    head: Conv2d<B>,
    activation: Relu,
}

impl<B: Backend> MassNet<B> {
    /// Builds the network and loads its weights from a checkpoint.
    ///
    /// `checkpoint` may be a `.mpk` record, a record path without its
    /// extension, or a directory, in which case the most recent record inside
    /// it is used. The record read is the one named in the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, no checkpoint can be
    /// found, or the record does not match the network.
    pub fn restore(
        config: &MassNetConfig,
        checkpoint: &Path,
        device: &B::Device,
    ) -> ModelResult<Self> {
        let path = resolve_checkpoint(checkpoint)?;
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();

        let model = config
            .init(device)?
            .load_file(path.clone(), &recorder, device)
            .map_err(|e| ModelError::CheckpointLoadFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!(checkpoint = %path.display(), "variables restored");
        Ok(model)
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = input;
        for layer in &self.layers {
            x = self.activation.forward(layer.forward(x));
        }
        self.head.forward(x)
    }
}

impl<B: Backend> SegmentationModel<B> for MassNet<B> {
    fn predict(&self, image: Tensor<B, 2>) -> Tensor<B, 2> {
        let [height, width] = image.dims();
        let input = per_image_standardization(image).reshape([1, 1, height, width]);

        self.forward(input).reshape([height, width])
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use burn::tensor::{TensorData, Tolerance};

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn predict_preserves_spatial_shape() {
        let device = Default::default();
        let model = MassNetConfig::new()
            .with_hidden_channels(4)
            .with_num_layers(2)
            .init::<TestBackend>(&device)
            .expect("valid config");

        let image = Tensor::<TestBackend, 2>::ones([9, 13], &device);
        let logits = model.predict(image);

        assert_eq!(logits.dims(), [9, 13]);
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let device = Default::default();

        let even_kernel = MassNetConfig::new().with_kernel_size(4);
        assert!(matches!(
            even_kernel.init::<TestBackend>(&device),
            Err(ModelError::InvalidConfiguration { .. })
        ));

        let no_layers = MassNetConfig::new().with_num_layers(0);
        assert!(matches!(
            no_layers.init::<TestBackend>(&device),
            Err(ModelError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn restore_round_trips_saved_weights() {
        let device = Default::default();
        let dir = std::env::temp_dir().join(format!("massseg-model-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");

        let config = MassNetConfig::new().with_hidden_channels(2).with_num_layers(1);
        let model = config.init::<TestBackend>(&device).expect("valid config");
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        model
            .clone()
            .save_file(dir.join("model"), &recorder)
            .expect("checkpoint saved");

        let restored = MassNet::<TestBackend>::restore(&config, &dir, &device)
            .expect("checkpoint restored");

        let image = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]),
            &device,
        );
        model
            .predict(image.clone())
            .into_data()
            .assert_approx_eq::<f32>(&restored.predict(image).into_data(), Tolerance::default());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn restore_reports_missing_checkpoint() {
        let device = Default::default();
        let missing = std::env::temp_dir().join("massseg-model-does-not-exist.mpk");

        let result = MassNet::<TestBackend>::restore(&MassNetConfig::new(), &missing, &device);

        assert!(matches!(result, Err(ModelError::CheckpointNotFound { .. })));
    }

    #[test]
    fn restore_reads_exactly_the_named_record() {
        let device = Default::default();
        let dir = std::env::temp_dir().join(format!("massseg-model-named-{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).expect("temp dir");

        let config = MassNetConfig::new().with_hidden_channels(2).with_num_layers(1);
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let first = config.init::<TestBackend>(&device).expect("valid config");
        first
            .clone()
            .save_file(dir.join("weights"), &recorder)
            .expect("checkpoint saved");
        let second = config.init::<TestBackend>(&device).expect("valid config");
        second
            .save_file(dir.join("other"), &recorder)
            .expect("checkpoint saved");
        fs::rename(dir.join("other.mpk"), dir.join("weights.bin")).expect("renamed");

        let foreign = MassNet::<TestBackend>::restore(&config, &dir.join("weights.bin"), &device);
        assert!(matches!(
            foreign,
            Err(ModelError::UnsupportedCheckpointFormat { .. })
        ));

        let restored = MassNet::<TestBackend>::restore(&config, &dir.join("weights"), &device)
            .expect("stem restored");
        let image = Tensor::<TestBackend, 2>::from_data(
            TensorData::from([[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]),
            &device,
        );
        first
            .predict(image.clone())
            .into_data()
            .assert_approx_eq::<f32>(&restored.predict(image).into_data(), Tolerance::default());

        fs::remove_dir_all(&dir).ok();
    }
}
