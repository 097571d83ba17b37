//! CSV ingest
//!
//! Parses an uploaded CSV export into member records. The header row
//! defines field names; hidden columns are stripped here so denylisted
//! data never reaches the store.

use crate::fields::is_hidden_field;
use crate::record::MemberRecord;
use crate::{Error, Result};

/// Parse CSV bytes into member records.
///
/// Empty lines are skipped; a ragged row (field count differing from the
/// header) is a malformed-input error and fails the whole parse — the
/// caller must not attempt a merge with partial data.
pub fn parse_members(bytes: &[u8]) -> Result<Vec<MemberRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| Error::MalformedCsv(e.to_string()))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| Error::MalformedCsv(e.to_string()))?;
        let mut record = MemberRecord::new();
        for (name, value) in headers.iter().zip(row.iter()) {
            if name.is_empty() || is_hidden_field(name) {
                continue;
            }
            record.set(name, value);
        }
        records.push(record);
    }

    Ok(records)
}
