//! End-to-end run: load posts, normalize and filter, aggregate, write.

use std::path::{Path, PathBuf};

use postprep_aggregate::{aggregate_and_bound, AggregateReport};
use postprep_clean::{normalize_and_filter, CleanReport, TextNormalizer};
use postprep_core::{PipelineConfig, Result};
use postprep_io::{load_posts, write_documents};
use serde::Serialize;
use tracing::info;

/// Summary of one run, written with `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub clean: CleanReport,
    pub aggregate: AggregateReport,
    pub duration_ms: u64,
}

/// Run the pipeline with the normalizer implied by `config`.
pub fn run(config: &PipelineConfig, input: &Path, output: &Path) -> Result<RunReport> {
    let normalizer = TextNormalizer::from_config(config)?;
    run_with(config, &normalizer, input, output)
}

/// Run the pipeline with a caller-supplied normalizer.
pub fn run_with(
    config: &PipelineConfig,
    normalizer: &TextNormalizer,
    input: &Path,
    output: &Path,
) -> Result<RunReport> {
    let start = std::time::Instant::now();

    let posts = load_posts(input, &config.columns, &config.encodings)?;
    let (cleaned, clean) = normalize_and_filter(&posts, normalizer, config.parallel);
    let (documents, aggregate) =
        aggregate_and_bound(&cleaned, config.max_words, config.author_order)?;
    write_documents(output, &documents, &config.columns)?;

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Run complete: {} posts -> {} author documents in {}ms",
        clean.total, aggregate.authors, duration_ms
    );

    Ok(RunReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        clean,
        aggregate,
        duration_ms,
    })
}
