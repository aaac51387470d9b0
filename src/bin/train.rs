//! Offline trainer: synthetic telemetry -> risk model artifact.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use risk_predictor::{
    config::{DEFAULT_META_PATH, DEFAULT_MODEL_PATH},
    model::{self, TrainConfig},
    synthetic,
};

#[derive(Parser, Debug)]
#[command(name = "train", about = "Train the telemetry risk classifier on synthetic data")]
struct Args {
    /// Number of synthetic readings to generate
    #[arg(long, default_value_t = synthetic::DEFAULT_SAMPLES)]
    samples: usize,

    /// Seed for both data generation and weight init
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 400)]
    epochs: usize,

    /// Hidden layer width
    #[arg(long, default_value_t = 16)]
    hidden: i64,

    #[arg(long, default_value_t = 1e-2)]
    learning_rate: f64,

    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model_out: PathBuf,

    #[arg(long, env = "META_PATH", default_value = DEFAULT_META_PATH)]
    meta_out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let data = synthetic::generate(args.samples, args.seed).context("failed to generate dataset")?;
    let cfg = TrainConfig {
        hidden: args.hidden,
        epochs: args.epochs,
        learning_rate: args.learning_rate,
        seed: args.seed,
    };
    let (mdl, report) = model::train(&data, &cfg).context("training failed")?;
    tracing::info!(
        "trained on {} samples ({} positive): loss={:.4} accuracy={:.3}",
        report.samples,
        report.positives,
        report.final_loss,
        report.accuracy
    );

    mdl.save(&args.model_out, &args.meta_out).with_context(|| {
        format!(
            "failed to write artifact {} / {}",
            args.model_out.display(),
            args.meta_out.display()
        )
    })?;
    tracing::info!("wrote {} and {}", args.model_out.display(), args.meta_out.display());
    Ok(())
}
