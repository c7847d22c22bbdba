//! Suffix-keeping word truncation.

/// Keep the trailing `max_words` whitespace-separated words of `text`,
/// rejoined with single spaces.
pub fn bound(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words.len().saturating_sub(max_words);
    words[start..].join(" ")
}

/// Document length policy: unbounded, or a fixed word budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthBounder {
    max_words: Option<usize>,
}

impl LengthBounder {
    pub fn new(max_words: Option<usize>) -> Self {
        Self { max_words }
    }

    pub fn max_words(&self) -> Option<usize> {
        self.max_words
    }

    /// Whether `text` is over the budget and would be cut.
    pub fn exceeds(&self, text: &str) -> bool {
        match self.max_words {
            Some(max) => text.split_whitespace().nth(max).is_some(),
            None => false,
        }
    }

    pub fn apply(&self, text: String) -> String {
        match self.max_words {
            Some(max) => bound(&text, max),
            None => text,
        }
    }
}
