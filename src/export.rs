//! CSV export — the annotated table plus the effective reply column.
//!
//! Column order is fixed so repeated exports of the same state are
//! byte-identical. `final_reply` is the saved edit for the row when one
//! exists, the auto reply otherwise. Contact lists are flattened with
//! `"; "` for the CSV cells.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use tracing::info;

use crate::enrich::types::AnnotatedRecord;
use crate::error::ExportError;

/// Exported columns, in order.
pub const EXPORT_COLUMNS: [&str; 9] = [
    "sender",
    "subject",
    "body",
    "emails",
    "phones",
    "priority",
    "sentiment",
    "auto_reply",
    "final_reply",
];

/// Write the export CSV to any writer.
pub fn write_csv<W: io::Write>(
    records: &[AnnotatedRecord],
    edits: &HashMap<usize, String>,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS)?;

    for record in records {
        let emails = record.contact.emails.join("; ");
        let phones = record.contact.phones.join("; ");
        let priority = record.priority.to_string();
        let final_reply = edits
            .get(&record.index)
            .map(String::as_str)
            .unwrap_or(&record.auto_reply);

        csv_writer.write_record([
            record.sender.as_str(),
            record.subject.as_str(),
            record.body.as_str(),
            emails.as_str(),
            phones.as_str(),
            priority.as_str(),
            record.sentiment.as_str(),
            record.auto_reply.as_str(),
            final_reply,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render the export CSV into a byte buffer (for HTTP downloads).
pub fn to_csv_bytes(
    records: &[AnnotatedRecord],
    edits: &HashMap<usize, String>,
) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(records, edits, &mut buf)?;
    Ok(buf)
}

/// Write the export CSV to a file path.
pub fn export_to_path(
    records: &[AnnotatedRecord],
    edits: &HashMap<usize, String>,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(records, edits, io::BufWriter::new(file))?;
    info!(path = %path.display(), count = records.len(), "exported table");
    Ok(())
}
