//! Field name normalization and classification
//!
//! CSV exports arrive with inconsistent column naming (`MobilePhone`,
//! `mobile_phone`, `Mobile Phone`). Every comparison of field names in the
//! tracker goes through [`normalize_field_name`] so the three spellings are
//! treated as the same column.

/// Columns stripped on ingest and never stored or displayed.
///
/// Entries are normalized names; compare with [`is_hidden_field`].
const HIDDEN_FIELDS: [&str; 13] = [
    "membership code",
    "start date",
    "end date",
    "credit balance",
    "payments",
    "due date",
    "membership status",
    "is recurring",
    "suspended by",
    "setup fee",
    "membership type",
    "recurrence status",
    "auto renewal",
];

/// Fields authored through the table UI, never present in CSV input.
///
/// These are matched by exact name (they only ever originate from the UI,
/// which uses these spellings).
pub const ANNOTATION_FIELDS: [&str; 5] = [
    "notes",
    "firstContact",
    "secondContact",
    "thirdContact",
    "finalContact",
];

/// Identifying-field classification used to build identity keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Phone,
    Email,
    Id,
    Other,
}

impl FieldKind {
    /// Token prefix used in identity keys
    pub fn token(self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Phone => "phone",
            FieldKind::Email => "email",
            FieldKind::Id => "id",
            FieldKind::Other => "other",
        }
    }
}

/// Normalize a field name for comparison.
///
/// Inserts a space before each upper-case letter that follows a lower-case
/// letter (splitting camelCase), replaces underscores with spaces,
/// lower-cases, and trims.
pub fn normalize_field_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = ch.is_ascii_lowercase();
        if ch == '_' {
            out.push(' ');
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out.trim().to_string()
}

/// Whether a column is on the hidden denylist
pub fn is_hidden_field(name: &str) -> bool {
    let normalized = normalize_field_name(name);
    HIDDEN_FIELDS.contains(&normalized.as_str())
}

/// Whether a field is one of the UI-authored annotation fields
pub fn is_annotation_field(name: &str) -> bool {
    ANNOTATION_FIELDS.contains(&name)
}

/// Classify a field name as identifying (name/phone/email/id) or other.
///
/// Name columns exclude anything mentioning "member" so that
/// "Membership Name" style columns don't pass for a guest name.
pub fn field_kind(name: &str) -> FieldKind {
    let normalized = normalize_field_name(name);
    if normalized.contains("name") && !normalized.contains("member") {
        FieldKind::Name
    } else if normalized.contains("phone") {
        FieldKind::Phone
    } else if normalized.contains("email") {
        FieldKind::Email
    } else if normalized.contains("id") {
        FieldKind::Id
    } else {
        FieldKind::Other
    }
}
