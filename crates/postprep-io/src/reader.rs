//! CSV post loading.
//!
//! The file is decoded with the first configured encoding that accepts
//! every byte, then parsed with headers. Author and text columns are
//! required; the label column is optional and its absence is recorded on
//! the batch.

use std::path::Path;

use encoding_rs::Encoding;
use postprep_core::{ColumnNames, Error, PostBatch, RawPost, Result};
use tracing::{debug, info, warn};

/// Decode `bytes` with the first encoding in `encodings` that succeeds.
///
/// Labels follow the WHATWG encoding registry (`utf-8`, `latin1`,
/// `windows-1252`, ...). Returns the text and the encoding that worked.
pub fn decode_with_fallback(
    bytes: &[u8],
    encodings: &[String],
) -> Result<(String, &'static Encoding)> {
    for label in encodings {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::Config(format!("unknown encoding: {}", label)))?;

        match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => {
                let text = text.strip_prefix('\u{feff}').unwrap_or(&text).to_string();
                return Ok((text, encoding));
            }
            None => warn!("Input is not valid {}, trying next encoding", encoding.name()),
        }
    }

    Err(Error::Decode(format!(
        "input could not be decoded with any of: {}",
        encodings.join(", ")
    )))
}

/// Parse decoded CSV text into raw posts.
pub fn parse_posts(text: &str, columns: &ColumnNames) -> Result<PostBatch> {
    let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    let headers = reader.headers().map_err(csv_error)?.clone();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let author_idx = position(&columns.author).ok_or_else(|| {
        Error::Schema(format!("author column {:?} not found", columns.author))
    })?;
    let text_idx = position(&columns.text)
        .ok_or_else(|| Error::Schema(format!("text column {:?} not found", columns.text)))?;
    let label_idx = position(&columns.label);
    if label_idx.is_none() {
        debug!("No label column {:?}; documents will carry no label", columns.label);
    }

    let mut posts = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        posts.push(RawPost {
            author_id: record.get(author_idx).unwrap_or("").to_string(),
            text: non_empty(record.get(text_idx)),
            label: label_idx.and_then(|idx| non_empty(record.get(idx))),
        });
    }

    Ok(PostBatch {
        has_label_column: label_idx.is_some(),
        posts,
    })
}

/// Read, decode and parse a CSV file of posts.
pub fn load_posts(path: &Path, columns: &ColumnNames, encodings: &[String]) -> Result<PostBatch> {
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_with_fallback(&bytes, encodings)?;
    let batch = parse_posts(&text, columns)?;
    info!(
        "Loaded {} posts from {} (encoding: {}, label column: {})",
        batch.posts.len(),
        path.display(),
        encoding.name(),
        batch.has_label_column
    );
    Ok(batch)
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.filter(|c| !c.is_empty()).map(str::to_string)
}

fn csv_error(e: csv::Error) -> Error {
    Error::Csv(e.to_string())
}
