//! Member record model
//!
//! A member record is an ordered mapping from field name to string value.
//! Field order follows the CSV header (plus any annotation fields appended
//! later) and is preserved through storage so the table UI renders columns
//! in a stable order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::fields::{field_kind, is_hidden_field, normalize_field_name, FieldKind};

/// One member: ordered field name → value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberRecord {
    fields: Vec<(String, String)>,
}

impl MemberRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of a field, by exact name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a field, replacing an existing field of the same name or
    /// appending a new one at the end
    pub fn set(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove a field by exact name
    pub fn remove(&mut self, name: &str) {
        self.fields.retain(|(field, _)| field != name);
    }

    /// Iterate fields in order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Drop every field on the hidden denylist (idempotent)
    pub fn strip_hidden(&mut self) {
        self.fields.retain(|(name, _)| !is_hidden_field(name));
    }

    /// Copy of this record without hidden fields
    pub fn without_hidden(&self) -> Self {
        let mut cleaned = self.clone();
        cleaned.strip_hidden();
        cleaned
    }

    /// Composite row key over every field: `name:value` pairs (values
    /// trimmed), sorted by field name and joined with `|`.
    ///
    /// Unlike the identity key this includes annotation fields, so it pins
    /// down one exact row for store lookups and per-row uniqueness. Empty
    /// records yield `""`.
    pub fn composite_key(&self) -> String {
        let mut parts: Vec<String> = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value.trim()))
            .collect();
        parts.sort();
        parts.join("|")
    }
}

impl FromIterator<(String, String)> for MemberRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut record = MemberRecord::new();
        for (name, value) in iter {
            record.set(&name, &value);
        }
        record
    }
}

// Records serialize as plain JSON objects (`{"Guest": "Jane Doe", ...}`) in
// field order, matching what the table UI consumes and what the store keeps
// in its `data` column.
impl Serialize for MemberRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MemberRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = MemberRecord;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut record = MemberRecord::new();
                while let Some((name, value)) = map.next_entry::<String, serde_json::Value>()? {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        serde_json::Value::Number(n) => n.to_string(),
                        serde_json::Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "field '{}' has non-scalar value: {}",
                                name, other
                            )))
                        }
                    };
                    record.set(&name, &value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Column roles for one collection of records.
///
/// Resolved once per collection from the first record's field set (every
/// row of a CSV shares the header) instead of re-scanning field names per
/// row. Hidden columns are never part of a schema.
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    name_columns: Vec<String>,
    phone_columns: Vec<String>,
    email_columns: Vec<String>,
    id_columns: Vec<String>,
    suspend_date_column: Option<String>,
    guest_column: Option<String>,
    search_phone_column: Option<String>,
}

impl RecordSchema {
    /// Build a schema from one record's field set
    pub fn from_record(record: &MemberRecord) -> Self {
        let mut schema = RecordSchema::default();
        for name in record.field_names() {
            if is_hidden_field(name) {
                continue;
            }
            match field_kind(name) {
                FieldKind::Name => schema.name_columns.push(name.to_string()),
                FieldKind::Phone => schema.phone_columns.push(name.to_string()),
                FieldKind::Email => schema.email_columns.push(name.to_string()),
                FieldKind::Id => schema.id_columns.push(name.to_string()),
                FieldKind::Other => {}
            }

            let normalized = normalize_field_name(name);
            if schema.suspend_date_column.is_none()
                && (normalized == "suspend date" || normalized == "suspended date")
            {
                schema.suspend_date_column = Some(name.to_string());
            }
            if schema.guest_column.is_none() && normalized == "guest" {
                schema.guest_column = Some(name.to_string());
            }
            if schema.search_phone_column.is_none()
                && (normalized == "mobile phone"
                    || normalized == "mobilephone"
                    || normalized == "phone")
            {
                schema.search_phone_column = Some(name.to_string());
            }
        }
        schema
    }

    /// Schema for a whole collection: the first record defines the field set
    pub fn for_collection(records: &[MemberRecord]) -> Self {
        records
            .first()
            .map(RecordSchema::from_record)
            .unwrap_or_default()
    }

    /// Identifying columns of one kind, in field order
    pub fn identifying_columns(&self, kind: FieldKind) -> &[String] {
        match kind {
            FieldKind::Name => &self.name_columns,
            FieldKind::Phone => &self.phone_columns,
            FieldKind::Email => &self.email_columns,
            FieldKind::Id => &self.id_columns,
            FieldKind::Other => &[],
        }
    }

    /// Column holding the suspend date, if the collection has one
    pub fn suspend_date_column(&self) -> Option<&str> {
        self.suspend_date_column.as_deref()
    }

    /// Column holding the guest name, if the collection has one
    pub fn guest_column(&self) -> Option<&str> {
        self.guest_column.as_deref()
    }

    /// Column holding the phone number used by search, if present
    pub fn search_phone_column(&self) -> Option<&str> {
        self.search_phone_column.as_deref()
    }
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
    fn test_set_preserves_order_and_replaces() {
        let mut r = MemberRecord::new();
        r.set("Guest", "Jane");
        r.set("MobilePhone", "555");
        r.set("Guest", "Janet");

        let names: Vec<&str> = r.field_names().collect();
        assert_eq!(names, vec!["Guest", "MobilePhone"]);
        assert_eq!(r.get("Guest"), Some("Janet"));
    }

    #[test]
    fn test_strip_hidden() {
        let mut r = record(&[
            ("Guest", "Jane"),
            ("Membership Code", "X1"),
            ("autoRenewal", "yes"),
        ]);
        r.strip_hidden();
        let names: Vec<&str> = r.field_names().collect();
        assert_eq!(names, vec!["Guest"]);
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let r = record(&[("Guest", "Jane"), ("MobilePhone", "555"), ("notes", "")]);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"Guest":"Jane","MobilePhone":"555","notes":""}"#);

        let back: MemberRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_deserialize_coerces_scalars() {
        let back: MemberRecord =
            serde_json::from_str(r#"{"Guest":"Jane","Visits":3,"Active":true,"Left":null}"#)
                .unwrap();
        assert_eq!(back.get("Visits"), Some("3"));
        assert_eq!(back.get("Active"), Some("true"));
        assert_eq!(back.get("Left"), Some(""));
    }

    #[test]
    fn test_composite_key_sorted_and_trimmed() {
        let r = record(&[("MobilePhone", " 555 "), ("Guest", "Jane")]);
        assert_eq!(r.composite_key(), "Guest:Jane|MobilePhone:555");
        assert_eq!(MemberRecord::new().composite_key(), "");
    }

    #[test]
    fn test_schema_from_first_record() {
        let records = vec![
            record(&[
                ("Guest", "Jane"),
                ("MobilePhone", "555"),
                ("Email", "j@x.com"),
                ("Suspend Date", "01/02/2024"),
            ]),
            record(&[("Other", "field set ignored")]),
        ];
        let schema = RecordSchema::for_collection(&records);
        // "Guest" does not mention "name", so it is not an identifying
        // name column; the phone column carries identity here
        assert!(schema.identifying_columns(FieldKind::Name).is_empty());
        assert_eq!(
            schema.identifying_columns(FieldKind::Phone),
            &["MobilePhone".to_string()]
        );
        assert_eq!(schema.suspend_date_column(), Some("Suspend Date"));
        assert_eq!(schema.guest_column(), Some("Guest"));
        assert_eq!(schema.search_phone_column(), Some("MobilePhone"));
    }

    #[test]
    fn test_schema_skips_hidden_columns() {
        // A hidden date column must not become the suspend-date column
        let schema = RecordSchema::from_record(&record(&[
            ("Start Date", "01/01/2024"),
            ("Guest Name", "Jane"),
        ]));
        assert_eq!(
            schema.identifying_columns(FieldKind::Name),
            &["Guest Name".to_string()]
        );
        assert_eq!(schema.suspend_date_column(), None);
    }
}
