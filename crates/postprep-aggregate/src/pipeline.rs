//! Per-author stage: aggregate kept posts, then apply the length policy.

use postprep_core::{AuthorOrder, CleanedBatch, DocumentBatch, Error, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::AuthorAggregator;
use crate::bounder::LengthBounder;

/// Counts for one `aggregate_and_bound` run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateReport {
    pub posts: usize,
    pub anonymous_posts: usize,
    pub authors: usize,
    pub max_words: Option<usize>,
    /// Documents cut down to `max_words`.
    pub truncated: usize,
    pub duration_ms: u64,
}

/// Build one document per author and bound each to `max_words` (if set).
///
/// A bound of zero words is rejected as a configuration error.
pub fn aggregate_and_bound(
    batch: &CleanedBatch,
    max_words: Option<usize>,
    order: AuthorOrder,
) -> Result<(DocumentBatch, AggregateReport)> {
    if max_words == Some(0) {
        return Err(Error::Config("max_words must be at least 1".into()));
    }

    let start = std::time::Instant::now();
    let bounder = LengthBounder::new(max_words);
    let mut report = AggregateReport {
        posts: batch.posts.len(),
        max_words,
        ..Default::default()
    };

    info!(
        "Aggregating {} posts by author (order: {:?}, max_words: {:?})",
        batch.posts.len(),
        order,
        max_words
    );

    let mut aggregator = AuthorAggregator::new();
    for post in &batch.posts {
        aggregator.push(post);
    }
    report.anonymous_posts = aggregator.anonymous_posts();
    if report.anonymous_posts > 0 {
        warn!("Skipped {} posts without an author id", report.anonymous_posts);
    }

    let mut documents = aggregator.finish(batch.has_label_column, order);
    for doc in &mut documents {
        if bounder.exceeds(&doc.final_text) {
            report.truncated += 1;
        }
        doc.final_text = bounder.apply(std::mem::take(&mut doc.final_text));
    }

    report.authors = documents.len();
    report.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Aggregation complete: authors={}, truncated={}, duration={}ms",
        report.authors, report.truncated, report.duration_ms
    );

    Ok((
        DocumentBatch {
            has_label_column: batch.has_label_column,
            documents,
        },
        report,
    ))
}
