//! Post retention decision.

use postprep_core::CleanOutcome;

/// Decides whether a normalized post survives into aggregation.
///
/// Every rejection path of the normalizer ends in the same place here: a
/// post is kept iff it has non-empty cleaned text.
pub struct PostFilter;

impl PostFilter {
    pub fn keep(clean_text: &str) -> bool {
        !clean_text.is_empty()
    }

    pub fn keep_outcome(outcome: &CleanOutcome) -> bool {
        match outcome {
            CleanOutcome::Kept(text) => Self::keep(text),
            CleanOutcome::Rejected(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postprep_core::RejectReason;

    #[test]
    fn test_keep_text() {
        assert!(PostFilter::keep("ok"));
        assert!(!PostFilter::keep(""));
    }

    #[test]
    fn test_keep_outcome() {
        assert!(PostFilter::keep_outcome(&CleanOutcome::Kept("hi".into())));
        assert!(!PostFilter::keep_outcome(&CleanOutcome::Kept(String::new())));
        for reason in RejectReason::all() {
            assert!(!PostFilter::keep_outcome(&CleanOutcome::Rejected(*reason)));
        }
    }
}
