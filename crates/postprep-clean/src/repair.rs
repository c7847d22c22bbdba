//! Encoding repair, the first normalization step.
//!
//! The `TextRepair` trait abstracts over mojibake repair. Implementations:
//! - `MojibakeRepair`: undoes UTF-8 text that was decoded as Windows-1252,
//!   then applies NFC normalization.
//! - `NoRepair`: passes text through untouched.

use std::borrow::Cow;
use std::sync::Arc;

use encoding_rs::WINDOWS_1252;
use postprep_core::RepairMode;
use unicode_normalization::{is_nfc, UnicodeNormalization};

/// Trait for encoding repair backends.
pub trait TextRepair: Send + Sync {
    /// Return the repaired text, borrowing when nothing changed.
    fn repair<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Identity repair.
pub struct NoRepair;

impl TextRepair for NoRepair {
    fn repair<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Repairs the most common mojibake: UTF-8 bytes shown through a
/// Windows-1252 decoder (`donâ€™t`, `cafÃ©`).
///
/// Each character is mapped back to its Windows-1252 byte. Wherever those
/// bytes form a valid multi-byte UTF-8 sequence, the sequence is replaced by
/// the character it encodes. Everything else stays as written, so correct
/// text (`café`, `it’s`, emoji) can sit next to repaired text in one post.
pub struct MojibakeRepair;

// Windows-1252 characters in the 0x80..=0x9F block.
const CP1252_SPECIALS: &[char] = &[
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

fn may_be_mis_decoded(text: &str) -> bool {
    text.chars()
        .any(|c| ('\u{80}'..='\u{FF}').contains(&c) || CP1252_SPECIALS.contains(&c))
}

fn cp1252_byte(c: char) -> Option<u8> {
    if c.is_ascii() {
        return Some(c as u8);
    }
    let mut buf = [0u8; 4];
    let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    match (unmappable, bytes.as_ref()) {
        (false, [byte]) => Some(*byte),
        _ => None,
    }
}

fn utf8_sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn decode_sequence(units: &[(char, Option<u8>)], len: usize) -> Option<char> {
    let bytes = units
        .get(..len)?
        .iter()
        .map(|(_, byte)| *byte)
        .collect::<Option<Vec<u8>>>()?;
    std::str::from_utf8(&bytes).ok()?.chars().next()
}

fn undo_cp1252(text: &str) -> Option<String> {
    if !may_be_mis_decoded(text) {
        return None;
    }
    let units: Vec<(char, Option<u8>)> = text.chars().map(|c| (c, cp1252_byte(c))).collect();

    let mut out = String::with_capacity(text.len());
    let mut changed = false;
    let mut i = 0;
    while i < units.len() {
        let (c, byte) = units[i];
        if let Some(len) = byte.and_then(utf8_sequence_len) {
            if let Some(fixed) = decode_sequence(&units[i..], len) {
                out.push(fixed);
                changed = true;
                i += len;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }

    changed.then_some(out)
}

impl TextRepair for MojibakeRepair {
    fn repair<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let repaired = match undo_cp1252(text) {
            Some(fixed) => Cow::Owned(fixed),
            None => Cow::Borrowed(text),
        };
        if is_nfc(&repaired) {
            repaired
        } else {
            Cow::Owned(repaired.nfc().collect())
        }
    }
}

/// Create the repair backend selected by configuration.
pub fn for_mode(mode: RepairMode) -> Arc<dyn TextRepair> {
    match mode {
        RepairMode::Mojibake => Arc::new(MojibakeRepair),
        RepairMode::None => Arc::new(NoRepair),
    }
}
