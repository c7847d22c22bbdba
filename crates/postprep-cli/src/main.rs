//! postprep: clean social-media posts and aggregate them per author.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use postprep_core::PipelineConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "postprep",
    version,
    about = "Clean social-media posts and aggregate them into one document per author"
)]
struct Cli {
    /// Input CSV of posts.
    input: PathBuf,

    /// Output CSV of author documents.
    output: PathBuf,

    /// JSON pipeline config. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep only the last N words of each author document.
    #[arg(long, value_name = "N")]
    max_words: Option<usize>,

    /// Ignore any configured word bound.
    #[arg(long, conflicts_with = "max_words")]
    unbounded: bool,

    /// Normalize posts on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Write a JSON run report to this path.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::resolve(cli.config.as_deref())?;
    if let Some(n) = cli.max_words {
        config.max_words = Some(n);
    }
    if cli.unbounded {
        config.max_words = None;
    }
    if cli.sequential {
        config.parallel = false;
    }
    config.validate()?;

    let report = postprep_cli::run(&config, &cli.input, &cli.output)
        .with_context(|| format!("failed to process {}", cli.input.display()))?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("Wrote run report to {}", path.display());
    }

    Ok(())
}
