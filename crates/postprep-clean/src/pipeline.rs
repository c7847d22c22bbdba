//! Per-record stage: normalize every raw post, then drop rejected ones.

use std::collections::BTreeMap;

use postprep_core::{CleanedBatch, CleanedPost, PostBatch, RejectReason};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::filter::PostFilter;
use crate::normalizer::TextNormalizer;

/// Outcome counts for one `normalize_and_filter` run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub total: usize,
    pub kept: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
    pub duration_ms: u64,
}

impl CleanReport {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn rejected_for(&self, reason: RejectReason) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }
}

/// Normalize every post and keep only the survivors, in input order.
///
/// With `parallel` set, posts are normalized on the rayon pool. The
/// indexed collect keeps results in input order, so aggregation sees the
/// same sequence either way.
pub fn normalize_and_filter(
    batch: &PostBatch,
    normalizer: &TextNormalizer,
    parallel: bool,
) -> (CleanedBatch, CleanReport) {
    let start = std::time::Instant::now();
    info!(
        "Normalizing {} posts (parallel: {})",
        batch.posts.len(),
        parallel
    );

    let cleaned: Vec<CleanedPost> = if parallel {
        batch
            .posts
            .par_iter()
            .map(|post| normalizer.normalize_post(post))
            .collect()
    } else {
        batch
            .posts
            .iter()
            .map(|post| normalizer.normalize_post(post))
            .collect()
    };

    let mut report = CleanReport {
        total: cleaned.len(),
        ..Default::default()
    };
    for post in &cleaned {
        match post.outcome.reject_reason() {
            Some(reason) => *report.rejected.entry(reason).or_insert(0) += 1,
            None => report.kept += 1,
        }
    }

    let posts: Vec<CleanedPost> = cleaned
        .into_iter()
        .filter(|post| PostFilter::keep_outcome(&post.outcome))
        .collect();

    report.duration_ms = start.elapsed().as_millis() as u64;
    for (reason, count) in &report.rejected {
        debug!("Rejected {} posts: {}", count, reason);
    }
    info!(
        "Normalization complete: kept={}, rejected={}, duration={}ms",
        report.kept,
        report.rejected_total(),
        report.duration_ms
    );

    (
        CleanedBatch {
            has_label_column: batch.has_label_column,
            posts,
        },
        report,
    )
}
