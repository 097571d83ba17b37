//! Roster viewing and editing API
//!
//! All handlers here (and in the upload module) require an authenticated
//! account and check location access before touching the store, so a
//! location user learns nothing about rosters outside their scope.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use smt_common::db::{members, User};
use smt_common::fields::is_annotation_field;
use smt_common::search::filter_members;
use smt_common::sort::sort_by_suspend_date;
use smt_common::{Error, MemberRecord};
use tracing::info;

use crate::AppState;

/// Query parameters for roster viewing
#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    /// Search term: digits match phone numbers, anything else guest names
    pub search: Option<String>,
}

/// Roster response, chronologically sorted
#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub location: String,
    pub total: usize,
    pub members: Vec<MemberRecord>,
}

/// Replace-roster request body
#[derive(Debug, Deserialize)]
pub struct ReplaceRequest {
    pub members: Vec<MemberRecord>,
}

/// Annotation request: set one annotation field on one member
#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub member: MemberRecord,
    pub field: String,
    pub value: String,
}

/// Delete request: remove one member
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub member: MemberRecord,
}

/// GET /api/members/:location?search=
///
/// Returns the stored roster, oldest suspension first, optionally filtered
/// by a search term.
pub async fn get_members(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(location): Path<String>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<RosterResponse>, MembersError> {
    require_location_access(&user, &location)?;

    let roster = members::load_for_location(&state.db, &location).await?;
    let mut roster = sort_by_suspend_date(roster);
    if let Some(search) = &query.search {
        roster = filter_members(roster, search);
    }

    Ok(Json(RosterResponse {
        total: roster.len(),
        location,
        members: roster,
    }))
}

/// PUT /api/members/:location
///
/// Replaces the stored roster wholesale. Hidden fields are stripped and
/// the roster re-sorted before storing.
pub async fn replace_members(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(location): Path<String>,
    Json(request): Json<ReplaceRequest>,
) -> Result<Json<RosterResponse>, MembersError> {
    require_location_access(&user, &location)?;

    let cleaned: Vec<MemberRecord> = request
        .members
        .iter()
        .map(MemberRecord::without_hidden)
        .collect();
    let roster = sort_by_suspend_date(cleaned);

    members::replace_all(&state.db, &location, &roster).await?;

    Ok(Json(RosterResponse {
        total: roster.len(),
        location,
        members: roster,
    }))
}

/// POST /api/members/:location/annotate
///
/// Sets one of the five annotation fields on the member matching the given
/// record. 404 when no stored member matches.
pub async fn annotate_member(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(location): Path<String>,
    Json(request): Json<AnnotateRequest>,
) -> Result<Json<RosterResponse>, MembersError> {
    require_location_access(&user, &location)?;

    if !is_annotation_field(&request.field) {
        return Err(MembersError::InvalidInput(format!(
            "'{}' is not an annotation field",
            request.field
        )));
    }

    let mut roster = members::load_for_location(&state.db, &location).await?;
    let target = request.member.without_hidden().composite_key();

    let member = roster
        .iter_mut()
        .find(|record| record.composite_key() == target)
        .ok_or_else(|| MembersError::NotFound("No matching member".to_string()))?;
    member.set(&request.field, &request.value);

    members::replace_all(&state.db, &location, &roster).await?;

    Ok(Json(RosterResponse {
        total: roster.len(),
        location,
        members: roster,
    }))
}

/// POST /api/members/:location/delete
///
/// Removes the member matching the given record. 404 when no stored member
/// matches.
pub async fn delete_member(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(location): Path<String>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<RosterResponse>, MembersError> {
    require_location_access(&user, &location)?;

    let mut roster = members::load_for_location(&state.db, &location).await?;
    let target = request.member.without_hidden().composite_key();

    let before = roster.len();
    roster.retain(|record| record.composite_key() != target);
    if roster.len() == before {
        return Err(MembersError::NotFound("No matching member".to_string()));
    }

    members::replace_all(&state.db, &location, &roster).await?;

    Ok(Json(RosterResponse {
        total: roster.len(),
        location,
        members: roster,
    }))
}

/// DELETE /api/members/:location
///
/// Clears the location's roster.
pub async fn clear_members(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(location): Path<String>,
) -> Result<Json<RosterResponse>, MembersError> {
    require_location_access(&user, &location)?;

    members::replace_all(&state.db, &location, &[]).await?;
    info!("Cleared roster for {}", location);

    Ok(Json(RosterResponse {
        total: 0,
        location,
        members: Vec::new(),
    }))
}

/// Reject before any data is read or written when the account is not
/// allowed the location
pub fn require_location_access(user: &User, location: &str) -> Result<(), MembersError> {
    if user.may_access(location) {
        Ok(())
    } else {
        Err(MembersError::AccessDenied(
            "Access denied to this location".to_string(),
        ))
    }
}

/// Member API errors
#[derive(Debug)]
pub enum MembersError {
    AccessDenied(String),
    NotFound(String),
    InvalidInput(String),
    MalformedCsv(String),
    DatabaseError(String),
    Internal(String),
}

impl From<Error> for MembersError {
    fn from(err: Error) -> Self {
        match err {
            Error::AccessDenied(msg) => MembersError::AccessDenied(msg),
            Error::NotFound(msg) => MembersError::NotFound(msg),
            Error::InvalidInput(msg) => MembersError::InvalidInput(msg),
            Error::MalformedCsv(msg) => MembersError::MalformedCsv(msg),
            Error::Database(e) => MembersError::DatabaseError(e.to_string()),
            other => MembersError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for MembersError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MembersError::AccessDenied(msg) => (StatusCode::FORBIDDEN, msg),
            MembersError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            MembersError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            MembersError::MalformedCsv(msg) => {
                (StatusCode::BAD_REQUEST, format!("Malformed input: {}", msg))
            }
            MembersError::DatabaseError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
            MembersError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
