//! CSV upload and reconciliation
//!
//! The upload endpoint is the only way member data enters the system: the
//! posted CSV is parsed, reconciled against the stored roster, and the
//! merged result replaces it atomically.

use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use smt_common::db::{members, User};
use smt_common::ingest::parse_members;
use smt_common::reconcile::reconcile;
use smt_common::sort::sort_by_suspend_date;
use tracing::info;

use crate::api::members::{require_location_access, MembersError, RosterResponse};
use crate::{AppState, MAX_BODY_BYTES};

/// POST /api/members/:location/upload
///
/// Accepts a multipart CSV file, reconciles it against the stored roster
/// (annotations preserved for members present in both, absent members
/// dropped as renewed), and atomically replaces the stored set. A parse
/// failure leaves the stored roster untouched.
pub async fn upload_roster(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(location): Path<String>,
    multipart: Multipart,
) -> Result<Json<RosterResponse>, MembersError> {
    require_location_access(&user, &location)?;

    let bytes = read_upload(multipart).await?;
    let uploaded = parse_members(&bytes)?;

    let existing = members::load_for_location(&state.db, &location).await?;
    let merged = reconcile(&existing, &uploaded);
    let roster = sort_by_suspend_date(merged);

    members::replace_all(&state.db, &location, &roster).await?;

    info!(
        "Reconciled upload for {}: {} stored + {} uploaded -> {} suspended",
        location,
        existing.len(),
        uploaded.len(),
        roster.len()
    );

    Ok(Json(RosterResponse {
        total: roster.len(),
        location,
        members: roster,
    }))
}

/// Pull the CSV payload out of the multipart body (first `file` field, or
/// the first field carrying a filename)
async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, MembersError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MembersError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        let named_file = field.name() == Some("file") || field.file_name().is_some();
        if !named_file {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| MembersError::InvalidInput(format!("Failed to read upload: {}", e)))?;

        if bytes.len() > MAX_BODY_BYTES {
            return Err(MembersError::InvalidInput(
                "Upload too large".to_string(),
            ));
        }

        return Ok(bytes.to_vec());
    }

    Err(MembersError::InvalidInput(
        "Missing 'file' field in upload".to_string(),
    ))
}
