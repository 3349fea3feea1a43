//! Command line front end for threshold-sweep evaluation.
//!
//! ## Usage
//!
//! ```bash
//! # Evaluate the latest checkpoint with the default layout
//! massseg evaluate
//!
//! # Start from a configuration file and override a few fields
//! massseg evaluate --config eval.json --thresholds 50 --seed 1
//!
//! # Print the whole report at the end
//! massseg evaluate --no-stream > eval
//!
//! # Show the backend and the default configuration
//! massseg info
//! ```

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use massseg::{
    backend::BackendSummary,
    burn_backend_types::EvalDevice,
    logging::{init_tracing, Verbosity},
    report::LossLine,
    run_on_selected_backend, EvaluationConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only warnings and errors on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep thresholds over the validation set and print the mean metrics
    Evaluate(EvaluateArgs),
    /// Print the selected backend and the default configuration
    Info,
}

#[derive(clap::Args, Debug)]
struct EvaluateArgs {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Checkpoint file or directory
    #[arg(long)]
    checkpoint: Option<String>,

    /// CSV manifest of image,label rows
    #[arg(short, long)]
    manifest: Option<String>,

    /// Directory the manifest paths are relative to
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Number of thresholds to evaluate
    #[arg(short, long)]
    thresholds: Option<usize>,

    /// Seed for the example thresholds are derived from
    #[arg(short, long)]
    seed: Option<u64>,

    /// Also write the report as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the report once the sweep is done instead of per threshold
    #[arg(long)]
    no_stream: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(Verbosity::from_flags(cli.verbose, cli.quiet))
        .context("Failed to initialize logging")?;

    match cli.command {
        Command::Evaluate(args) => evaluate(args),
        Command::Info => info(),
    }
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    // Load configuration
    let mut config = match &args.config {
        Some(path) => EvaluationConfig::from_file(path)?,
        None => EvaluationConfig::new(),
    };

    // Apply command line overrides
    if let Some(checkpoint) = args.checkpoint {
        config.checkpoint = checkpoint;
    }
    if let Some(manifest) = args.manifest {
        config.manifest_path = manifest;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(thresholds) = args.thresholds {
        config.number_of_thresholds = thresholds;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let stream = !args.no_stream;
    let report = run_on_selected_backend(&config, |threshold| {
        if stream {
            println!("{threshold}");
        }
    })
    .context("Evaluation failed")?;

    if stream {
        print!("{}", LossLine(report.logistic_loss));
    } else {
        print!("{report}");
    }

    if let Some(best) = report.best_by_iou() {
        tracing::info!(
            index = best.index,
            threshold = best.threshold,
            probability = best.probability,
            iou = best.metrics.iou,
            "best threshold by IOU"
        );
    }

    if let Some(path) = &args.json {
        let json = report.to_json().context("Failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(())
}

fn info() -> Result<()> {
    println!("Backend: {}", BackendSummary::new(&EvalDevice::default()));
    let defaults = serde_json::to_string_pretty(&EvaluationConfig::new())
        .context("Failed to serialize default configuration")?;
    println!("Default configuration:\n{defaults}");
    Ok(())
}
