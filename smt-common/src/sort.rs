//! Chronological roster ordering
//!
//! Rosters display oldest suspension first. Exports write the suspend date
//! in whatever format the source system liked that month, so parsing is
//! forgiving and anything unreadable sorts to the front (epoch) instead of
//! failing the request.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::record::{MemberRecord, RecordSchema};

/// Sort records by their suspend-date column, oldest first.
///
/// The suspend-date column is resolved from the first record's field set;
/// collections without one are returned unchanged. The sort is stable, so
/// equal dates (including unparseable ones) keep their input order.
pub fn sort_by_suspend_date(mut records: Vec<MemberRecord>) -> Vec<MemberRecord> {
    let schema = RecordSchema::for_collection(&records);
    let Some(column) = schema.suspend_date_column().map(str::to_string) else {
        return records;
    };

    records.sort_by_cached_key(|record| parse_suspend_date(record.get(&column).unwrap_or("")));
    records
}

/// Parse a suspend-date value, resolving unparseable input to the epoch.
///
/// Attempts, in order: RFC 3339, ISO datetime, `MM/DD/YYYY`, `YYYY-MM-DD`.
pub fn parse_suspend_date(raw: &str) -> NaiveDate {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NaiveDate::default();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return dt.date();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return date;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date;
    }
    // chrono's default NaiveDate is the Unix epoch
    NaiveDate::default()
}
