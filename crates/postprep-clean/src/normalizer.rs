//! Post normalization: the ordered rewrite sequence applied to one raw post.
//!
//! Steps, each operating on the output of the previous one:
//! 1. encoding repair
//! 2. HTML entity decoding
//! 3. quoted-reply line removal
//! 4. markdown link unwrapping
//! 5. bot phrase rejection
//! 6. URL, user and sub substitution
//! 7. symbol squashing
//! 8. whitespace collapsing
//! 9. length / language gate

use std::borrow::Cow;
use std::sync::Arc;

use once_cell::sync::Lazy;
use postprep_core::config::SHORT_TEXT_THRESHOLD;
use postprep_core::{
    CleanOutcome, CleanedPost, Error, PipelineConfig, RawPost, RejectReason, Result, Sentinels,
};
use regex::{Captures, NoExpand, Regex};
use tracing::trace;

use crate::language::{LanguageIdentifier, LinguaIdentifier};
use crate::repair::{self, TextRepair};

// Compiled regex patterns (compiled once, reused).
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*>.*$").unwrap());
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+|www\.\S+").unwrap());
static USER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"u/\S+").unwrap());
static SUB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"r/\S+").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#?[0-9A-Za-z]+;?").unwrap());

// Entities HTML still decodes without a trailing semicolon.
const LEGACY_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("AMP", "&"),
    ("lt", "<"),
    ("LT", "<"),
    ("gt", ">"),
    ("GT", ">"),
    ("quot", "\""),
    ("QUOT", "\""),
    ("nbsp", "\u{a0}"),
    ("copy", "\u{a9}"),
    ("COPY", "\u{a9}"),
    ("reg", "\u{ae}"),
    ("REG", "\u{ae}"),
];

/// Normalizes raw post text. Built once per run and shared read-only
/// across workers.
pub struct TextNormalizer {
    /// Lowercased.
    bot_phrases: Vec<String>,
    sentinels: Sentinels,
    squash: Option<Regex>,
    target_language: String,
    repair: Arc<dyn TextRepair>,
    identifier: Arc<dyn LanguageIdentifier>,
}

impl TextNormalizer {
    pub fn new(
        config: &PipelineConfig,
        repair: Arc<dyn TextRepair>,
        identifier: Arc<dyn LanguageIdentifier>,
    ) -> Result<Self> {
        let squash = match squash_pattern(&config.squash_symbols) {
            Some(pattern) => Some(Regex::new(&pattern).map_err(|e| {
                Error::Config(format!("invalid squash symbols {:?}: {}", config.squash_symbols, e))
            })?),
            None => None,
        };

        Ok(Self {
            bot_phrases: config.bot_phrases.iter().map(|p| p.to_lowercase()).collect(),
            sentinels: config.sentinels.clone(),
            squash,
            target_language: config.target_language.clone(),
            repair,
            identifier,
        })
    }

    /// Normalizer with the configured repair mode and `lingua` identification.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(
            config,
            repair::for_mode(config.repair),
            Arc::new(LinguaIdentifier::new()),
        )
    }

    /// Normalize one raw post body.
    pub fn normalize(&self, raw: &str) -> CleanOutcome {
        let text = self.repair.repair(raw);
        let text = decode_entities(&text);
        let text = QUOTE_RE.replace_all(&text, "");
        let text = MARKDOWN_LINK_RE.replace_all(&text, "${1}");

        if self.is_bot_content(&text) {
            return CleanOutcome::Rejected(RejectReason::BotContent);
        }

        let text = URL_RE.replace_all(&text, NoExpand(&self.sentinels.url));
        let text = USER_RE.replace_all(&text, NoExpand(&self.sentinels.user));
        let text = SUB_RE.replace_all(&text, NoExpand(&self.sentinels.sub));

        let text = match &self.squash {
            Some(re) => re.replace_all(&text, |caps: &Captures| {
                caps[0].chars().take(1).collect::<String>()
            }),
            None => Cow::Borrowed(&*text),
        };

        let text = WHITESPACE_RE.replace_all(&text, " ");
        self.gate(text.trim())
    }

    /// String form of `normalize`: `""` for every rejection.
    pub fn clean(&self, raw: &str) -> String {
        self.normalize(raw).into_text().unwrap_or_default()
    }

    /// Normalize a raw record. A missing body is an empty post.
    pub fn normalize_post(&self, post: &RawPost) -> CleanedPost {
        let outcome = match post.text.as_deref() {
            Some(text) => self.normalize(text),
            None => CleanOutcome::Rejected(RejectReason::Empty),
        };
        CleanedPost {
            author_id: post.author_id.clone(),
            outcome,
            label: post.label.clone(),
        }
    }

    fn is_bot_content(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.bot_phrases.iter().any(|p| lower.contains(p.as_str()))
    }

    fn gate(&self, text: &str) -> CleanOutcome {
        if text.is_empty() {
            return CleanOutcome::Rejected(RejectReason::Empty);
        }

        // Identification is unreliable on very short strings.
        if text.chars().count() < SHORT_TEXT_THRESHOLD {
            return if text.is_ascii() {
                CleanOutcome::Kept(text.to_string())
            } else {
                CleanOutcome::Rejected(RejectReason::ShortNonAscii)
            };
        }

        match self.identifier.identify(text) {
            Ok(lang) if lang == self.target_language => CleanOutcome::Kept(text.to_string()),
            Ok(lang) => {
                trace!("Rejecting post identified as {}", lang);
                CleanOutcome::Rejected(RejectReason::NonEnglish)
            }
            Err(e) => {
                trace!("Rejecting post: {}", e);
                CleanOutcome::Rejected(RejectReason::LanguageUndetected)
            }
        }
    }
}

/// Decode HTML entities in one pass. Terminated and numeric references go
/// through `html_escape`; a bare legacy name decodes its longest known
/// prefix (`&lt3` becomes `<3`).
fn decode_entities(text: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(text, |caps: &Captures| {
        let entity = &caps[0];
        if entity.ends_with(';') || entity.starts_with("&#") {
            return html_escape::decode_html_entities(entity).into_owned();
        }
        let name = &entity[1..];
        LEGACY_ENTITIES
            .iter()
            .filter(|(legacy, _)| name.starts_with(legacy))
            .max_by_key(|(legacy, _)| legacy.len())
            .map(|(legacy, decoded)| format!("{}{}", decoded, &name[legacy.len()..]))
            .unwrap_or_else(|| entity.to_string())
    })
}

/// One alternative per distinct symbol: `(?:!){3,}|(?:\?){3,}|...`.
fn squash_pattern(symbols: &str) -> Option<String> {
    let mut distinct: Vec<char> = Vec::new();
    for c in symbols.chars().filter(|c| !c.is_whitespace()) {
        if !distinct.contains(&c) {
            distinct.push(c);
        }
    }
    if distinct.is_empty() {
        return None;
    }
    let alternatives: Vec<String> = distinct
        .iter()
        .map(|c| format!("(?:{}){{3,}}", regex::escape(&c.to_string())))
        .collect();
    Some(alternatives.join("|"))
}
