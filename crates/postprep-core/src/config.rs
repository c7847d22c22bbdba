//! Pipeline configuration: JSON file, environment fallbacks, defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Posts shorter than this (in characters) skip language identification.
pub const SHORT_TEXT_THRESHOLD: usize = 5;

pub const DEFAULT_BOT_PHRASES: &[&str] = &[
    "i am a bot",
    "action was performed automatically",
    "submission has been removed",
    "contact the moderators",
];

pub const DEFAULT_SQUASH_SYMBOLS: &str = "!?.@$";

/// ISO 639-3 code of the language posts must be written in.
pub const DEFAULT_TARGET_LANGUAGE: &str = "eng";

pub const MAX_WORDS_ENV: &str = "POSTPREP_MAX_WORDS";
pub const PARALLEL_ENV: &str = "POSTPREP_PARALLEL";

/// Input column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    #[serde(default = "default_author_column")]
    pub author: String,
    #[serde(default = "default_text_column")]
    pub text: String,
    #[serde(default = "default_label_column")]
    pub label: String,
}

// The source dataset ships with this misspelled header.
fn default_author_column() -> String {
    "auhtor_ID".into()
}
fn default_text_column() -> String {
    "post".into()
}
fn default_label_column() -> String {
    "extrovert".into()
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            author: default_author_column(),
            text: default_text_column(),
            label: default_label_column(),
        }
    }
}

/// Placeholder tokens substituted for URLs, user mentions and sub references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinels {
    #[serde(default = "default_url_sentinel")]
    pub url: String,
    #[serde(default = "default_user_sentinel")]
    pub user: String,
    #[serde(default = "default_sub_sentinel")]
    pub sub: String,
}

fn default_url_sentinel() -> String {
    "[URL]".into()
}
fn default_user_sentinel() -> String {
    "[USER]".into()
}
fn default_sub_sentinel() -> String {
    "[SUB]".into()
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            url: default_url_sentinel(),
            user: default_user_sentinel(),
            sub: default_sub_sentinel(),
        }
    }
}

/// Which encoding repair runs as the first normalization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairMode {
    #[default]
    Mojibake,
    None,
}

/// Order of author documents in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorOrder {
    /// Order in which each author first appears in the input.
    #[default]
    FirstSeen,
    /// By author id: numerically when every id is an integer, else as strings.
    Sorted,
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Encodings tried in order when decoding the input file.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
    #[serde(default)]
    pub columns: ColumnNames,
    #[serde(default = "default_bot_phrases")]
    pub bot_phrases: Vec<String>,
    #[serde(default)]
    pub sentinels: Sentinels,
    #[serde(default = "default_squash_symbols")]
    pub squash_symbols: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default)]
    pub repair: RepairMode,
    /// Keep only the trailing `max_words` words of each document. Absent = unbounded.
    #[serde(default)]
    pub max_words: Option<usize>,
    #[serde(default)]
    pub author_order: AuthorOrder,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_encodings() -> Vec<String> {
    vec!["utf-8".into(), "latin1".into()]
}
fn default_bot_phrases() -> Vec<String> {
    DEFAULT_BOT_PHRASES.iter().map(|s| s.to_string()).collect()
}
fn default_squash_symbols() -> String {
    DEFAULT_SQUASH_SYMBOLS.into()
}
fn default_target_language() -> String {
    DEFAULT_TARGET_LANGUAGE.into()
}
fn default_parallel() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            encodings: default_encodings(),
            columns: ColumnNames::default(),
            bot_phrases: default_bot_phrases(),
            sentinels: Sentinels::default(),
            squash_symbols: default_squash_symbols(),
            target_language: default_target_language(),
            repair: RepairMode::default(),
            max_words: None,
            author_order: AuthorOrder::default(),
            parallel: default_parallel(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: PipelineConfig = serde_json::from_str(&raw)?;
        info!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Build the run configuration: file (or defaults), then environment, then validation.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `POSTPREP_MAX_WORDS` and `POSTPREP_PARALLEL` overrides.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var(MAX_WORDS_ENV) {
            self.apply_max_words_override(&raw);
        }
        if let Ok(raw) = std::env::var(PARALLEL_ENV) {
            match parse_bool(&raw) {
                Some(parallel) => self.parallel = parallel,
                None => warn!("Ignoring invalid {}={:?}", PARALLEL_ENV, raw),
            }
        }
    }

    fn apply_max_words_override(&mut self, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
            self.max_words = None;
            return;
        }
        match raw.parse::<usize>() {
            Ok(n) => self.max_words = Some(n),
            Err(_) => warn!("Ignoring invalid {}={:?}", MAX_WORDS_ENV, raw),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.encodings.is_empty() {
            return Err(Error::Config("at least one input encoding is required".into()));
        }
        if self.max_words == Some(0) {
            return Err(Error::Config("max_words must be positive when set".into()));
        }
        let cols = &self.columns;
        if cols.author.is_empty() || cols.text.is_empty() || cols.label.is_empty() {
            return Err(Error::Config("column names must not be empty".into()));
        }
        if cols.author == cols.text || cols.author == cols.label || cols.text == cols.label {
            return Err(Error::Config(format!(
                "column names must be distinct: author={:?} text={:?} label={:?}",
                cols.author, cols.text, cols.label
            )));
        }
        if self.target_language.trim().is_empty() {
            return Err(Error::Config("target_language must not be empty".into()));
        }
        if self.bot_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::Config("bot phrases must not be blank".into()));
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
