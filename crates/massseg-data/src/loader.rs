//! Turning manifest entries into image and label tensors.

use std::path::{Path, PathBuf};

use burn::{
    prelude::*,
    tensor::{backend::Backend, TensorData},
};
use image::DynamicImage;
use massseg_metric::is_admissible;

use crate::{
    error::{DatasetError, DatasetResult},
    manifest::ManifestEntry,
};

/// A decoded validation example.
#[derive(Debug, Clone)]
pub struct Example<B: Backend> {
    /// Single-channel intensities, `[height, width]`.
    pub image: Tensor<B, 2>,
    /// Three-valued ground truth, same shape as `image`.
    pub label: Tensor<B, 2, Int>,
}

/// Source of validation examples.
pub trait ExampleLoader<B: Backend> {
    /// Loads only the image of an entry.
    fn load_image(&self, entry: &ManifestEntry, device: &B::Device) -> DatasetResult<Tensor<B, 2>>;

    /// Loads the image and its label.
    fn load(&self, entry: &ManifestEntry, device: &B::Device) -> DatasetResult<Example<B>>;
}

/// Loads examples from image files below a data directory.
#[derive(Debug, Clone)]
pub struct ImageFileLoader {
    data_dir: PathBuf,
}

impl ImageFileLoader {
    /// Creates a loader rooted at `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DataDirectoryNotFound`] if `data_dir` is not a
    /// directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> DatasetResult<Self> {
        let data_dir = data_dir.into();
        if !data_dir.is_dir() {
            return Err(DatasetError::DataDirectoryNotFound { path: data_dir });
        }
        Ok(Self { data_dir })
    }

    /// Resolves a manifest path against the data directory.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.data_dir.join(relative)
    }
}

impl<B: Backend> ExampleLoader<B> for ImageFileLoader {
    fn load_image(&self, entry: &ManifestEntry, device: &B::Device) -> DatasetResult<Tensor<B, 2>> {
        let path = self.resolve(&entry.image);
        let image = open(&path)?;
        Ok(image_to_tensor(image, device))
    }

    fn load(&self, entry: &ManifestEntry, device: &B::Device) -> DatasetResult<Example<B>> {
        let image_path = self.resolve(&entry.image);
        let label_path = self.resolve(&entry.label);
        tracing::trace!(image = %image_path.display(), label = %label_path.display(), "loading example");

        let image = open(&image_path)?;
        let label = open(&label_path)?;

        if image.width() != label.width() || image.height() != label.height() {
            return Err(DatasetError::DimensionMismatch {
                image: image_path,
                image_height: image.height() as usize,
                image_width: image.width() as usize,
                label: label_path,
                label_height: label.height() as usize,
                label_width: label.width() as usize,
            });
        }

        Ok(Example {
            image: image_to_tensor(image, device),
            label: label_to_tensor(&label_path, label, device)?,
        })
    }
}

fn open(path: &Path) -> DatasetResult<DynamicImage> {
    image::open(path).map_err(|source| DatasetError::ImageOpenFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Grayscale intensities as floats in the file's own sample range (0..=255
/// for 8-bit, 0..=65535 for 16-bit images), not rescaled to [0, 1]. The
/// whitening floor in the model depends on that scale.
fn image_to_tensor<B: Backend>(image: DynamicImage, device: &B::Device) -> Tensor<B, 2> {
    let height = image.height() as usize;
    let width = image.width() as usize;
    let data: Vec<f32> = match &image {
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => image
            .to_luma16()
            .into_raw()
            .into_iter()
            .map(f32::from)
            .collect(),
        _ => image.to_luma8().into_raw().into_iter().map(f32::from).collect(),
    };

    Tensor::from_data(TensorData::new(data, [height, width]), device)
}

fn label_to_tensor<B: Backend>(
    path: &Path,
    label: DynamicImage,
    device: &B::Device,
) -> DatasetResult<Tensor<B, 2, Int>> {
    let height = label.height() as usize;
    let width = label.width() as usize;
    let raw = label.to_luma8().into_raw();

    if let Some(&value) = raw.iter().find(|&&value| !is_admissible(i64::from(value))) {
        return Err(DatasetError::InvalidLabelValue {
            path: path.to_path_buf(),
            value,
        });
    }

    let data: Vec<i64> = raw.into_iter().map(i64::from).collect();
    Ok(Tensor::from_data(TensorData::new(data, [height, width]), device))
}
