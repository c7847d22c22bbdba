//! Author document output.

use std::io::Write;
use std::path::Path;

use postprep_core::{ColumnNames, DocumentBatch, Error, Result};
use tracing::info;

pub const FINAL_TEXT_COLUMN: &str = "final_text";

/// Write documents as CSV: author column, `final_text`, and the label
/// column only when the input had one.
pub fn write_documents_to<W: Write>(
    writer: W,
    batch: &DocumentBatch,
    columns: &ColumnNames,
) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec![columns.author.as_str(), FINAL_TEXT_COLUMN];
    if batch.has_label_column {
        header.push(columns.label.as_str());
    }
    out.write_record(&header).map_err(csv_error)?;

    for doc in &batch.documents {
        let mut row = vec![doc.author_id.as_str(), doc.final_text.as_str()];
        if batch.has_label_column {
            row.push(doc.label.as_deref().unwrap_or(""));
        }
        out.write_record(&row).map_err(csv_error)?;
    }

    out.flush()?;
    Ok(())
}

pub fn write_documents(path: &Path, batch: &DocumentBatch, columns: &ColumnNames) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_documents_to(std::io::BufWriter::new(file), batch, columns)?;
    info!(
        "Saved {} author documents to {}",
        batch.documents.len(),
        path.display()
    );
    Ok(())
}

fn csv_error(e: csv::Error) -> Error {
    Error::Csv(e.to_string())
}
