//! Identity keys
//!
//! A member's identity key is the composite string used to recognize the
//! same person across upload cycles, built from whichever identifying
//! columns the export happens to carry.

use crate::fields::{is_annotation_field, is_hidden_field, FieldKind};
use crate::record::{MemberRecord, RecordSchema};

/// Identifying kinds in priority order
const KIND_PRIORITY: [FieldKind; 4] = [
    FieldKind::Name,
    FieldKind::Phone,
    FieldKind::Email,
    FieldKind::Id,
];

/// Build the identity key for a record.
///
/// For each identifying kind (name, phone, email, id) the first schema
/// column with a non-empty trimmed value contributes a
/// `kind:<trimmed lowercase value>` token. If no identifying column has a
/// value, every non-empty, non-annotation field contributes a
/// `<fieldName>:<trimmed lowercase value>` token instead. Tokens are
/// sorted and joined with `|`.
///
/// Returns `""` when the record has no usable data; such records can never
/// be matched across uploads.
pub fn identity_key(record: &MemberRecord, schema: &RecordSchema) -> String {
    let mut tokens: Vec<String> = Vec::new();

    for kind in KIND_PRIORITY {
        for column in schema.identifying_columns(kind) {
            if let Some(value) = record.get(column) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    tokens.push(format!("{}:{}", kind.token(), trimmed.to_lowercase()));
                    break;
                }
            }
        }
    }

    // Fallback: no standard identifiers found, key off every real field
    if tokens.is_empty() {
        for (name, value) in record.fields() {
            if is_annotation_field(name) || is_hidden_field(name) {
                continue;
            }
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                tokens.push(format!("{}:{}", name, trimmed.to_lowercase()));
            }
        }
    }

    tokens.sort();
    tokens.join("|")
}
