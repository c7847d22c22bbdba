//! Records flowing through the pipeline: raw posts in, author documents out.

use std::fmt;

use serde::Serialize;

/// One input row: a post body keyed by its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub author_id: String,
    /// Post body. `None` when the cell was empty or missing.
    pub text: Option<String>,
    pub label: Option<String>,
}

impl RawPost {
    pub fn new(author_id: &str, text: Option<&str>, label: Option<&str>) -> Self {
        Self {
            author_id: author_id.to_string(),
            text: text.map(str::to_string),
            label: label.map(str::to_string),
        }
    }
}

/// All raw posts of one run plus the shape of the input schema.
#[derive(Debug, Clone, Default)]
pub struct PostBatch {
    /// Whether the input had a label column at all.
    pub has_label_column: bool,
    pub posts: Vec<RawPost>,
}

/// Why a post was discarded by normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Nothing left after cleaning, or no body at all.
    Empty,
    /// Contains a known automoderator phrase.
    BotContent,
    /// Under the short-text threshold and not pure ASCII.
    ShortNonAscii,
    /// Identified as a language other than the target.
    NonEnglish,
    /// The language identifier could not decide.
    LanguageUndetected,
}

impl RejectReason {
    pub fn all() -> &'static [RejectReason] {
        &[
            Self::Empty,
            Self::BotContent,
            Self::ShortNonAscii,
            Self::NonEnglish,
            Self::LanguageUndetected,
        ]
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::BotContent => write!(f, "bot_content"),
            Self::ShortNonAscii => write!(f, "short_non_ascii"),
            Self::NonEnglish => write!(f, "non_english"),
            Self::LanguageUndetected => write!(f, "language_undetected"),
        }
    }
}

/// Result of normalizing one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    Kept(String),
    Rejected(RejectReason),
}

impl CleanOutcome {
    pub fn is_kept(&self) -> bool {
        matches!(self, Self::Kept(_))
    }

    /// The cleaned text, or `""` for any rejection.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Kept(text) => text,
            Self::Rejected(_) => "",
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Kept(text) => Some(text),
            Self::Rejected(_) => None,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Kept(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// A raw post after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub author_id: String,
    pub outcome: CleanOutcome,
    pub label: Option<String>,
}

impl CleanedPost {
    pub fn clean_text(&self) -> &str {
        self.outcome.as_text()
    }
}

/// Cleaned posts in original input order.
#[derive(Debug, Clone, Default)]
pub struct CleanedBatch {
    pub has_label_column: bool,
    pub posts: Vec<CleanedPost>,
}

/// All kept posts of one author, joined into a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorDocument {
    pub author_id: String,
    pub final_text: String,
    /// First non-null label seen for this author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentBatch {
    /// Mirrors the input schema: output carries a label column iff this is set.
    pub has_label_column: bool,
    pub documents: Vec<AuthorDocument>,
}

impl DocumentBatch {
    pub fn get(&self, author_id: &str) -> Option<&AuthorDocument> {
        self.documents.iter().find(|d| d.author_id == author_id)
    }
}
