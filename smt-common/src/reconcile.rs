//! Roster reconciliation
//!
//! Merges a freshly uploaded member list against the stored list for a
//! location. Members present in both keep their annotations but take the
//! upload's field values; members only in the upload are newly suspended;
//! members only in the stored list have renewed and are dropped.

use std::collections::{HashMap, HashSet};

use crate::fields::ANNOTATION_FIELDS;
use crate::identity::identity_key;
use crate::record::{MemberRecord, RecordSchema};

/// Where each emitted new record came from, in upload row order
enum NewEntry {
    /// First appearance of an identity key not present in the stored set
    Keyed(String),
    /// Row with no usable identity; passes through as-is
    Unkeyed(MemberRecord),
}

/// Reconcile the stored roster with an uploaded member list.
///
/// Pure and deterministic: the same inputs always produce the same output,
/// with matched members first (in stored order) followed by new members
/// (in upload row order). Duplicate identity keys on either side collapse
/// last-write-wins; rows with no usable identity are always treated as new.
pub fn reconcile(existing: &[MemberRecord], incoming: &[MemberRecord]) -> Vec<MemberRecord> {
    let existing: Vec<MemberRecord> = existing.iter().map(MemberRecord::without_hidden).collect();
    let incoming: Vec<MemberRecord> = incoming.iter().map(MemberRecord::without_hidden).collect();

    let existing_schema = RecordSchema::for_collection(&existing);
    let incoming_schema = RecordSchema::for_collection(&incoming);

    // Stored records by identity key, last write wins; keys in first-seen
    // order so matched output follows stored presentation order.
    // Unkeyable stored records are dropped here: they can never match an
    // upload row, so carrying them forward would duplicate them per upload.
    let mut stored: HashMap<String, MemberRecord> = HashMap::new();
    let mut stored_order: Vec<String> = Vec::new();
    for record in existing {
        let key = identity_key(&record, &existing_schema);
        if key.is_empty() {
            continue;
        }
        if stored.insert(key.clone(), record).is_none() {
            stored_order.push(key);
        }
    }

    let mut uploaded: HashMap<String, MemberRecord> = HashMap::new();
    let mut new_entries: Vec<NewEntry> = Vec::new();
    let mut matched: HashSet<String> = HashSet::new();
    for record in incoming {
        let key = identity_key(&record, &incoming_schema);
        if key.is_empty() {
            new_entries.push(NewEntry::Unkeyed(record));
            continue;
        }
        let first_seen = !uploaded.contains_key(&key);
        uploaded.insert(key.clone(), record);
        if stored.contains_key(&key) {
            matched.insert(key);
        } else if first_seen {
            new_entries.push(NewEntry::Keyed(key));
        }
    }

    let mut merged: Vec<MemberRecord> = Vec::new();

    // Still suspended: refreshed upload data, stored annotations carried over
    for key in &stored_order {
        if !matched.contains(key) {
            continue; // renewed, drop
        }
        if let (Some(refreshed), Some(prior)) = (uploaded.get(key), stored.get(key)) {
            merged.push(carry_annotations(refreshed.clone(), prior));
        }
    }

    // Newly suspended, in upload row order
    for entry in new_entries {
        match entry {
            NewEntry::Keyed(key) => {
                if let Some(record) = uploaded.remove(&key) {
                    merged.push(record);
                }
            }
            NewEntry::Unkeyed(record) => merged.push(record),
        }
    }

    merged
}

/// Copy non-empty annotation fields from the prior record onto the
/// refreshed one
fn carry_annotations(mut refreshed: MemberRecord, prior: &MemberRecord) -> MemberRecord {
    for field in ANNOTATION_FIELDS {
        if let Some(value) = prior.get(field) {
            if !value.is_empty() {
                refreshed.set(field, value);
            }
        }
    }
    refreshed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> MemberRecord {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_annotations_preserved_for_matched_member() {
        let existing = vec![record(&[
            ("Name", "Jane Doe"),
            ("Phone", "5551234567"),
            ("notes", "called"),
        ])];
        let incoming = vec![record(&[("Name", "Jane Doe"), ("Phone", "5551234567")])];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(
            merged,
            vec![record(&[
                ("Name", "Jane Doe"),
                ("Phone", "5551234567"),
                ("notes", "called"),
            ])]
        );
    }

    #[test]
    fn test_all_five_annotation_fields_carry_over() {
        let existing = vec![record(&[
            ("Name", "Jane"),
            ("notes", "n"),
            ("firstContact", "01/01"),
            ("secondContact", "01/08"),
            ("thirdContact", "01/15"),
            ("finalContact", "01/22"),
        ])];
        let incoming = vec![record(&[("Name", "Jane")])];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].get("notes"), Some("n"));
        assert_eq!(merged[0].get("firstContact"), Some("01/01"));
        assert_eq!(merged[0].get("finalContact"), Some("01/22"));
    }

    #[test]
    fn test_renewed_member_dropped_and_new_member_added() {
        let existing = vec![record(&[("Name", "A")])];
        let incoming = vec![record(&[("Name", "B")])];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged, vec![record(&[("Name", "B")])]);
    }

    #[test]
    fn test_incoming_data_refreshes_matched_member() {
        let existing = vec![record(&[
            ("Name", "Jane"),
            ("Suspend Date", "01/01/2024"),
            ("notes", "keep me"),
        ])];
        let incoming = vec![record(&[("Name", "Jane"), ("Suspend Date", "03/01/2024")])];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged[0].get("Suspend Date"), Some("03/01/2024"));
        assert_eq!(merged[0].get("notes"), Some("keep me"));
    }

    #[test]
    fn test_empty_existing_annotation_not_copied() {
        let existing = vec![record(&[("Name", "Jane"), ("notes", "")])];
        let incoming = vec![record(&[("Name", "Jane")])];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged[0].get("notes"), None);
    }

    #[test]
    fn test_matching_across_naming_styles() {
        let existing = vec![record(&[("mobile_phone", "5551234567"), ("notes", "x")])];
        let incoming = vec![record(&[("MobilePhone", " 5551234567 ")])];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].get("notes"), Some("x"));
        assert_eq!(merged[0].get("MobilePhone"), Some(" 5551234567 "));
    }

    #[test]
    fn test_hidden_fields_never_survive() {
        let existing = vec![record(&[("Name", "A"), ("Start Date", "2020-01-01")])];
        let incoming = vec![record(&[("Name", "A"), ("Membership Code", "X")])];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].get("Start Date"), None);
        assert_eq!(merged[0].get("Membership Code"), None);
    }

    #[test]
    fn test_output_order_matched_then_new() {
        let existing = vec![
            record(&[("Name", "A")]),
            record(&[("Name", "B")]),
            record(&[("Name", "C")]),
        ];
        let incoming = vec![
            record(&[("Name", "D")]),
            record(&[("Name", "C")]),
            record(&[("Name", "A")]),
        ];

        let merged = reconcile(&existing, &incoming);
        let names: Vec<&str> = merged.iter().filter_map(|r| r.get("Name")).collect();
        // Matched in stored order (A, C), then new in upload order (D)
        assert_eq!(names, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_unkeyable_rows_pass_through_as_new() {
        let existing = vec![record(&[("Name", "A"), ("notes", "old")])];
        let incoming = vec![
            record(&[("Name", "")]),
            record(&[("Name", "A")]),
            record(&[("Name", " ")]),
        ];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged.len(), 3);
        // Matched member first, then both unmatchable rows in upload order
        assert_eq!(merged[0].get("notes"), Some("old"));
    }

    #[test]
    fn test_unkeyable_stored_records_dropped() {
        let existing = vec![record(&[("notes", "orphaned")])];
        let incoming = vec![record(&[("Name", "B")])];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged, vec![record(&[("Name", "B")])]);
    }

    #[test]
    fn test_duplicate_upload_rows_collapse_last_write_wins() {
        let existing: Vec<MemberRecord> = Vec::new();
        let incoming = vec![
            record(&[("Name", "Jane"), ("Visits", "1")]),
            record(&[("Name", "Jane"), ("Visits", "2")]),
        ];

        let merged = reconcile(&existing, &incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].get("Visits"), Some("2"));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let existing = vec![
            record(&[("Name", "A"), ("notes", "called")]),
            record(&[("Name", "B")]),
        ];
        let incoming = vec![record(&[("Name", "A")]), record(&[("Name", "C")])];

        let once = reconcile(&existing, &incoming);
        let twice = reconcile(&once, &incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_output_never_larger_than_upload() {
        let existing = vec![
            record(&[("Name", "A")]),
            record(&[("Name", "B")]),
            record(&[("Name", "C")]),
        ];
        let incoming = vec![record(&[("Name", "A")])];

        let merged = reconcile(&existing, &incoming);
        assert!(merged.len() <= incoming.len());
    }
}
