//! Language identification backends.

use lingua::{LanguageDetector, LanguageDetectorBuilder};
use thiserror::Error;

/// Failure to identify the language of a text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("no language could be identified")]
    Undetermined,
}

/// Trait for language identification.
pub trait LanguageIdentifier: Send + Sync {
    /// Identify the language of `text` as an ISO 639-3 code (e.g. `eng`).
    fn identify(&self, text: &str) -> Result<String, LanguageError>;
}

/// Language identification backed by `lingua` n-gram models, which stay
/// accurate on short, informal posts. Models load lazily on first use.
pub struct LinguaIdentifier {
    detector: LanguageDetector,
}

impl LinguaIdentifier {
    pub fn new() -> Self {
        Self {
            detector: LanguageDetectorBuilder::from_all_languages().build(),
        }
    }
}

impl Default for LinguaIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageIdentifier for LinguaIdentifier {
    fn identify(&self, text: &str) -> Result<String, LanguageError> {
        self.detector
            .detect_language_of(text)
            .map(|lang| lang.iso_code_639_3().to_string())
            .ok_or(LanguageError::Undetermined)
    }
}
