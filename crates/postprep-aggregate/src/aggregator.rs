//! Ordered per-author fold over cleaned posts.

use std::collections::HashMap;

use postprep_clean::PostFilter;
use postprep_core::{AuthorDocument, AuthorOrder, CleanedPost};

#[derive(Debug)]
struct Accumulator {
    author_id: String,
    texts: Vec<String>,
    label: Option<String>,
}

/// Groups kept posts by author.
///
/// Authors are indexed in first-seen order; each author's texts stay in
/// input order. The whole input must be pushed before `finish`, since
/// labels and concatenation need every post of an author.
#[derive(Debug, Default)]
pub struct AuthorAggregator {
    index: HashMap<String, usize>,
    accumulators: Vec<Accumulator>,
    anonymous: usize,
}

impl AuthorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one post. Rejected posts are ignored; posts without an author
    /// id are counted but not grouped.
    pub fn push(&mut self, post: &CleanedPost) {
        if !PostFilter::keep_outcome(&post.outcome) {
            return;
        }
        if post.author_id.is_empty() {
            self.anonymous += 1;
            return;
        }

        let slot = match self.index.get(&post.author_id) {
            Some(&slot) => slot,
            None => {
                self.accumulators.push(Accumulator {
                    author_id: post.author_id.clone(),
                    texts: Vec::new(),
                    label: None,
                });
                let slot = self.accumulators.len() - 1;
                self.index.insert(post.author_id.clone(), slot);
                slot
            }
        };

        let acc = &mut self.accumulators[slot];
        acc.texts.push(post.clean_text().to_string());
        if acc.label.is_none() {
            acc.label = post.label.clone();
        }
    }

    /// Number of kept posts that had no author id.
    pub fn anonymous_posts(&self) -> usize {
        self.anonymous
    }

    pub fn author_count(&self) -> usize {
        self.accumulators.len()
    }

    /// Materialize one document per author.
    pub fn finish(self, has_label_column: bool, order: AuthorOrder) -> Vec<AuthorDocument> {
        let mut documents: Vec<AuthorDocument> = self
            .accumulators
            .into_iter()
            .map(|acc| AuthorDocument {
                author_id: acc.author_id,
                final_text: acc.texts.join(" "),
                label: if has_label_column { acc.label } else { None },
            })
            .collect();

        if order == AuthorOrder::Sorted {
            sort_by_author(&mut documents);
        }
        documents
    }

    /// Fold a full sequence of posts into author documents.
    pub fn aggregate(
        posts: &[CleanedPost],
        has_label_column: bool,
        order: AuthorOrder,
    ) -> Vec<AuthorDocument> {
        let mut aggregator = Self::new();
        for post in posts {
            aggregator.push(post);
        }
        aggregator.finish(has_label_column, order)
    }
}

/// Numeric ids sort numerically when every id is an integer, otherwise
/// all ids sort as strings.
fn sort_by_author(documents: &mut [AuthorDocument]) {
    let numeric_key = |d: &AuthorDocument| d.author_id.trim().parse::<i64>().ok();
    if documents.iter().all(|d| numeric_key(d).is_some()) {
        documents.sort_by_cached_key(|d| numeric_key(d).unwrap_or_default());
    } else {
        documents.sort_by(|a, b| a.author_id.cmp(&b.author_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postprep_core::{CleanOutcome, RejectReason};

    fn kept(author: &str, text: &str, label: Option<&str>) -> CleanedPost {
        CleanedPost {
            author_id: author.into(),
            outcome: CleanOutcome::Kept(text.into()),
            label: label.map(str::to_string),
        }
    }

    fn rejected(author: &str, reason: RejectReason, label: Option<&str>) -> CleanedPost {
        CleanedPost {
            author_id: author.into(),
            outcome: CleanOutcome::Rejected(reason),
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn test_groups_in_input_order() {
        let posts = vec![kept("A", "x", None), kept("B", "y", None), kept("A", "z", None)];
        let docs = AuthorAggregator::aggregate(&posts, false, AuthorOrder::FirstSeen);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].author_id, "A");
        assert_eq!(docs[0].final_text, "x z");
        assert_eq!(docs[1].author_id, "B");
        assert_eq!(docs[1].final_text, "y");
    }

    #[test]
    fn test_author_with_only_rejected_posts_dropped() {
        let posts = vec![
            kept("A", "hello there", Some("1")),
            rejected("B", RejectReason::BotContent, Some("0")),
        ];
        let docs = AuthorAggregator::aggregate(&posts, true, AuthorOrder::FirstSeen);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].author_id, "A");
    }

    #[test]
    fn test_first_non_null_label_carried_forward() {
        let posts = vec![
            kept("A", "one", Some("1")),
            kept("A", "two", None),
            kept("B", "three", None),
            kept("B", "four", Some("0")),
            kept("B", "five", Some("1")),
        ];
        let docs = AuthorAggregator::aggregate(&posts, true, AuthorOrder::FirstSeen);
        assert_eq!(docs[0].label.as_deref(), Some("1"));
        assert_eq!(docs[1].label.as_deref(), Some("0"));
    }

    #[test]
    fn test_label_from_rejected_post_not_used() {
        let posts = vec![
            rejected("A", RejectReason::NonEnglish, Some("1")),
            kept("A", "hello", Some("0")),
        ];
        let docs = AuthorAggregator::aggregate(&posts, true, AuthorOrder::FirstSeen);
        assert_eq!(docs[0].label.as_deref(), Some("0"));
    }

    #[test]
    fn test_label_omitted_without_label_column() {
        let posts = vec![kept("A", "x", Some("1"))];
        let docs = AuthorAggregator::aggregate(&posts, false, AuthorOrder::FirstSeen);
        assert_eq!(docs[0].label, None);
    }

    #[test]
    fn test_sorted_order() {
        let posts = vec![kept("c", "1", None), kept("a", "2", None), kept("b", "3", None)];
        let docs = AuthorAggregator::aggregate(&posts, false, AuthorOrder::Sorted);
        let ids: Vec<&str> = docs.iter().map(|d| d.author_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sorted_numeric_ids() {
        let posts = vec![kept("10", "x", None), kept("9", "y", None), kept("100", "z", None)];
        let docs = AuthorAggregator::aggregate(&posts, false, AuthorOrder::Sorted);
        let ids: Vec<&str> = docs.iter().map(|d| d.author_id.as_str()).collect();
        assert_eq!(ids, vec!["9", "10", "100"]);
    }

    #[test]
    fn test_sorted_mixed_ids_fall_back_to_strings() {
        let posts = vec![kept("10", "x", None), kept("9", "y", None), kept("a1", "z", None)];
        let docs = AuthorAggregator::aggregate(&posts, false, AuthorOrder::Sorted);
        let ids: Vec<&str> = docs.iter().map(|d| d.author_id.as_str()).collect();
        assert_eq!(ids, vec!["10", "9", "a1"]);
    }

    #[test]
    fn test_anonymous_posts_counted_not_grouped() {
        let mut aggregator = AuthorAggregator::new();
        aggregator.push(&kept("", "nobody", None));
        aggregator.push(&kept("A", "someone", None));
        assert_eq!(aggregator.anonymous_posts(), 1);
        assert_eq!(aggregator.author_count(), 1);
        let docs = aggregator.finish(false, AuthorOrder::FirstSeen);
        assert_eq!(docs.len(), 1);
    }
}
