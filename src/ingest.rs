//! CSV ingest — parses support email exports into typed records.
//!
//! The contract is strict on shape and lenient on content: the three
//! required columns must exist (any casing, any position, extra columns
//! ignored), while cell values may be empty. Any structural problem
//! aborts the whole load; a partially ingested batch is never returned.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Required columns, matched case-insensitively against the header row.
const REQUIRED_COLUMNS: [&str; 3] = ["sender", "subject", "body"];

/// One raw support email, as it arrives in the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub sender: String,
    pub subject: String,
    pub body: String,
}

/// Parse CSV from any reader. Row order is preserved; a record's
/// position in the returned vector is its identity downstream.
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<EmailRecord>, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| InputError::Malformed {
            line: e
                .position()
                .map(|p| p.line())
                .unwrap_or(row as u64 + 2),
            reason: e.to_string(),
        })?;
        records.push(EmailRecord {
            sender: cell(&record, columns[0]),
            subject: cell(&record, columns[1]),
            body: cell(&record, columns[2]),
        });
    }

    tracing::debug!(count = records.len(), "parsed input records");
    Ok(records)
}

/// Parse a CSV file from disk.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<EmailRecord>, InputError> {
    let file = File::open(path.as_ref())?;
    read_records(io::BufReader::new(file))
}

/// Parse an uploaded CSV payload.
pub fn read_records_from_bytes(bytes: &[u8]) -> Result<Vec<EmailRecord>, InputError> {
    read_records(bytes)
}

/// Map required column names to header positions, case-insensitively.
fn resolve_columns(headers: &csv::StringRecord) -> Result<[usize; 3], InputError> {
    let mut positions = [0usize; 3];
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        positions[slot] = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| InputError::MissingColumn(name.to_string()))?;
    }
    Ok(positions)
}

/// Fetch a cell by position; short rows read as empty strings.
fn cell(record: &csv::StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").to_string()
}
