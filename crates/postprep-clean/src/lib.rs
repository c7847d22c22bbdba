//! postprep clean: per-post normalization and filtering.
//!
//! `TextNormalizer` applies the ordered rewrite sequence to one post,
//! `PostFilter` decides retention, and `normalize_and_filter` runs both over
//! a whole batch. Mojibake repair and language identification sit behind
//! the `TextRepair` and `LanguageIdentifier` traits.

pub mod filter;
pub mod language;
pub mod normalizer;
pub mod pipeline;
pub mod repair;

pub use filter::PostFilter;
pub use language::{LanguageError, LanguageIdentifier, LinguaIdentifier};
pub use normalizer::TextNormalizer;
pub use pipeline::{normalize_and_filter, CleanReport};
pub use repair::{MojibakeRepair, NoRepair, TextRepair};
