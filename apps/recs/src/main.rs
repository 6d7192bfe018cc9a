mod catalog;
mod cli;
mod config;
mod errors;
mod models;
mod output;
mod scoring;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on malformed env values)
    let config = Config::from_env()?;

    // Logs go to stderr so `show` output stays pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting recs v{}", env!("CARGO_PKG_VERSION"));
    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        "Using data layout"
    );

    cli::run(cli, &config)?;
    Ok(())
}
