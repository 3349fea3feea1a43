//! Threshold-sweep evaluation of breast mass segmentation models.
//!
//! A trained model produces per-pixel logits. For each of a set of
//! thresholds the evaluator turns those logits into a three-class mask
//! ([`post`]), scores it against the ground truth and averages the scores
//! over the validation manifest. Thresholds are derived from the logit range
//! of one randomly chosen example ([`ThresholdSweep`]).
//!
//! ## Usage
//!
//! ```bash
//! # Sweep 20 thresholds over val/val.csv with the latest checkpoint
//! massseg evaluate --checkpoint checkpoint --manifest val/val.csv --data-dir val/
//!
//! # Keep the report for later analysis
//! massseg evaluate --seed 42 --json eval.json | tee eval
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod logging;
pub mod postprocessing;
pub mod report;
pub mod thresholds;

#[doc(inline)]
pub use backend::burn_backend_types;
pub use config::EvaluationConfig;
pub use error::{EvalError, EvalResult};
pub use evaluation::{run_evaluation, run_on_selected_backend, Evaluator};
pub use postprocessing::post;
pub use report::{EvaluationReport, ThresholdReport};
pub use thresholds::{linspace, logit, sigmoid, ThresholdSweep};
