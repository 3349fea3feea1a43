//! The threshold sweep over the validation set.

use std::path::Path;

use burn::tensor::{backend::Backend, ElementConversion};
use massseg_data::{ExampleLoader, ImageFileLoader, Manifest};
use massseg_metric::{calculate_metrics, MetricsAggregator};
use massseg_model::{MassNet, SegmentationModel};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    backend::{
        burn_backend_types::{EvalBackend, EvalDevice},
        BackendSummary,
    },
    config::EvaluationConfig,
    error::EvalResult,
    postprocessing::post,
    report::{EvaluationReport, ThresholdReport},
    thresholds::ThresholdSweep,
};

/// Evaluates a model over every entry of a manifest.
///
/// Each pass over the manifest is independent: it starts from the first
/// entry, reloads every example and asks the model for fresh logits.
pub struct Evaluator<'a, B: Backend, M, L> {
    model: &'a M,
    loader: &'a L,
    manifest: &'a Manifest,
    device: B::Device,
}

impl<'a, B, M, L> Evaluator<'a, B, M, L>
where
    B: Backend,
    M: SegmentationModel<B>,
    L: ExampleLoader<B>,
{
    pub fn new(model: &'a M, loader: &'a L, manifest: &'a Manifest, device: B::Device) -> Self {
        Self {
            model,
            loader,
            manifest,
            device,
        }
    }

    /// Mean metrics over the manifest for one threshold.
    ///
    /// # Errors
    ///
    /// Fails on the first example that cannot be loaded or whose logits do
    /// not match its label.
    pub fn evaluate_threshold(
        &self,
        index: usize,
        threshold: f64,
        probability: f64,
    ) -> EvalResult<ThresholdReport> {
        let mut aggregator = MetricsAggregator::new();

        for entry in self.manifest.iter() {
            let example = self.loader.load(entry, &self.device)?;
            let logits = self.model.predict(example.image);
            let segmentation = post(logits, example.label.clone(), threshold)?;

            aggregator.update(calculate_metrics(segmentation, example.label));
        }

        tracing::debug!(index, threshold, examples = aggregator.count(), "threshold evaluated");

        Ok(ThresholdReport {
            index,
            threshold,
            probability,
            metrics: aggregator.mean(),
        })
    }

    /// Mean logistic loss over the manifest.
    ///
    /// # Errors
    ///
    /// Fails on the first example that cannot be loaded.
    pub fn mean_logistic_loss(&self) -> EvalResult<f64> {
        let mut total = 0.0;
        let mut count = 0usize;

        for entry in self.manifest.iter() {
            let example = self.loader.load(entry, &self.device)?;
            total += self
                .model
                .loss(example.image, example.label)
                .into_scalar()
                .elem::<f64>();
            count += 1;
        }

        Ok(total / count.max(1) as f64)
    }

    /// Samples thresholds, evaluates each of them and finally the loss.
    ///
    /// `on_threshold` is called as soon as a threshold is done, so results can
    /// be reported while the sweep is still running.
    ///
    /// # Errors
    ///
    /// Any loading failure or shape mismatch aborts the whole run.
    pub fn run<R, F>(
        &self,
        number_of_thresholds: usize,
        rng: &mut R,
        mut on_threshold: F,
    ) -> EvalResult<EvaluationReport>
    where
        R: Rng + ?Sized,
        F: FnMut(&ThresholdReport),
    {
        let sweep = ThresholdSweep::sample::<B, M, L, R>(
            self.model,
            self.loader,
            self.manifest,
            number_of_thresholds,
            rng,
            &self.device,
        )?;

        self.run_sweep(&sweep, &mut on_threshold)
    }

    /// Evaluates a precomputed sweep, then the loss.
    ///
    /// # Errors
    ///
    /// Any loading failure or shape mismatch aborts the whole run.
    pub fn run_sweep<F>(
        &self,
        sweep: &ThresholdSweep,
        mut on_threshold: F,
    ) -> EvalResult<EvaluationReport>
    where
        F: FnMut(&ThresholdReport),
    {
        let mut thresholds = Vec::with_capacity(sweep.len());
        for (index, threshold, probability) in sweep.iter() {
            tracing::info!(index, threshold, probability, "evaluating threshold");
            let report = self.evaluate_threshold(index, threshold, probability)?;
            on_threshold(&report);
            thresholds.push(report);
        }

        let logistic_loss = self.mean_logistic_loss()?;
        tracing::info!(logistic_loss, "evaluation completed");

        Ok(EvaluationReport {
            examples: self.manifest.len(),
            thresholds,
            logistic_loss,
        })
    }
}

/// Runs a full evaluation from a configuration.
///
/// Validates the configuration, restores the model, reads the manifest and
/// sweeps the thresholds. The random source is seeded from the configuration
/// when a seed is given.
///
/// # Errors
///
/// Returns the first configuration, loading or evaluation error encountered.
pub fn run_evaluation<B, F>(
    config: &EvaluationConfig,
    device: &B::Device,
    on_threshold: F,
) -> EvalResult<EvaluationReport>
where
    B: Backend,
    F: FnMut(&ThresholdReport),
{
    config.validate()?;

    tracing::info!(?device, checkpoint = %config.checkpoint, "restoring model");
    let model = MassNet::<B>::restore(&config.model, Path::new(&config.checkpoint), device)?;
    let manifest = Manifest::from_csv(&config.manifest_path)?;
    let loader = ImageFileLoader::new(&config.data_dir)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Evaluator::new(&model, &loader, &manifest, device.clone()).run(
        config.number_of_thresholds,
        &mut rng,
        on_threshold,
    )
}

/// Runs [`run_evaluation`] on the backend selected at build time.
///
/// # Errors
///
/// See [`run_evaluation`].
pub fn run_on_selected_backend<F>(
    config: &EvaluationConfig,
    on_threshold: F,
) -> EvalResult<EvaluationReport>
where
    F: FnMut(&ThresholdReport),
{
    let device = EvalDevice::default();
    tracing::info!(backend = %BackendSummary::new(&device), "starting evaluation");

    run_evaluation::<EvalBackend, F>(config, &device, on_threshold)
}
