//! Roster search filtering
//!
//! A search term containing any digit searches phone numbers (digits-only
//! comparison, so "(555) 123-4567" matches "555123"); anything else
//! searches the guest-name column case-insensitively.

use crate::record::{MemberRecord, RecordSchema};

/// Filter records by a search term.
///
/// A blank term returns the input unchanged. Records without the searched
/// column (or with an empty value in it) are excluded.
pub fn filter_members(records: Vec<MemberRecord>, term: &str) -> Vec<MemberRecord> {
    let term = term.trim();
    if term.is_empty() {
        return records;
    }

    let schema = RecordSchema::for_collection(&records);

    if term.chars().any(|c| c.is_ascii_digit()) {
        let Some(column) = schema.search_phone_column().map(str::to_string) else {
            return Vec::new();
        };
        let wanted = digits_of(term);
        records
            .into_iter()
            .filter(|record| {
                record
                    .get(&column)
                    .is_some_and(|phone| digits_of(phone).contains(&wanted))
            })
            .collect()
    } else {
        let Some(column) = schema.guest_column().map(str::to_string) else {
            return Vec::new();
        };
        let wanted = term.to_lowercase();
        records
            .into_iter()
            .filter(|record| {
                record
                    .get(&column)
                    .is_some_and(|name| name.to_lowercase().contains(&wanted))
            })
            .collect()
    }
}

/// Strip everything but digits (drops phone formatting characters)
fn digits_of(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<MemberRecord> {
        let rows: [&[(&str, &str)]; 3] = [
            &[("Guest", "Jane Doe"), ("MobilePhone", "(555) 123-4567")],
            &[("Guest", "John Roe"), ("MobilePhone", "555.987.6543")],
            &[("Guest", "Ada Moor"), ("MobilePhone", "")],
        ];
        rows.iter()
            .map(|pairs| {
                pairs
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_blank_term_returns_all() {
        assert_eq!(filter_members(roster(), "").len(), 3);
        assert_eq!(filter_members(roster(), "   ").len(), 3);
    }

    #[test]
    fn test_digit_term_matches_phone_ignoring_formatting() {
        let matched = filter_members(roster(), "5551234");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("Guest"), Some("Jane Doe"));
    }

    #[test]
    fn test_digit_prefix_matches_multiple() {
        let matched = filter_members(roster(), "555");
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_formatted_search_term_compares_digits_only() {
        let matched = filter_members(roster(), "(555) 987");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("Guest"), Some("John Roe"));
    }

    #[test]
    fn test_name_term_is_case_insensitive() {
        let matched = filter_members(roster(), "jane");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("Guest"), Some("Jane Doe"));
    }

    #[test]
    fn test_name_term_substring() {
        let matched = filter_members(roster(), "oe");
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_no_match_excludes_all() {
        assert!(filter_members(roster(), "zzz").is_empty());
        assert!(filter_members(roster(), "0000000").is_empty());
    }

    #[test]
    fn test_empty_phone_field_excluded_from_digit_search() {
        let matched = filter_members(roster(), "6543");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("Guest"), Some("John Roe"));
    }
}
