mod config;
mod data;
mod error;
mod ml;
mod pipeline;
mod report;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pipeline::Pipeline;

/// Runs the whole simulation with the defaults, `lottery.toml` or
/// `LOTTERY__*` environment overrides; there are no flags.
#[derive(Parser)]
#[command(name = "lottery-predictor")]
#[command(author = "Lottery Predictor")]
#[command(version = "0.1.0")]
#[command(about = "Train a classifier on synthetic lottery draws and report the top-scoring combinations", long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = crate::config::load().context("Failed to load configuration")?;

    // Initialize logging
    let default_level = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "Lottery predictor v0.1.0 (seed={:?}, classifier={})",
        config.generator.seed,
        config.model.kind.as_str()
    );

    let mut pipeline = Pipeline::new(config);
    pipeline.run().context("Simulation aborted")?;

    Ok(())
}
