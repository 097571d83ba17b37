//! Login sessions
//!
//! A successful login mints a bearer token; every later request resolves
//! its token back to the owning account. Expired sessions are deleted on
//! first sight.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::users::User;
use crate::{Error, Result};

/// Create a session for a user and return its bearer token.
///
/// Lifetime comes from the `session_timeout_seconds` setting.
pub async fn create_session(pool: &SqlitePool, user_guid: &str) -> Result<String> {
    let timeout_seconds: i64 = sqlx::query_scalar(
        "SELECT CAST(value AS INTEGER) FROM settings WHERE key = 'session_timeout_seconds'",
    )
    .fetch_optional(pool)
    .await?
    .unwrap_or(86400);

    let token = Uuid::new_v4().to_string();
    let expires_at = (Utc::now() + Duration::seconds(timeout_seconds)).to_rfc3339();

    sqlx::query("INSERT INTO sessions (token, user_guid, expires_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_guid)
        .bind(&expires_at)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolve a bearer token to its account.
///
/// Returns `None` for unknown or expired tokens; expired sessions are
/// removed as a side effect.
pub async fn lookup_user(pool: &SqlitePool, token: &str) -> Result<Option<User>> {
    let row: Option<(String, String, String, String, String)> = sqlx::query_as(
        r#"
        SELECT u.guid, u.username, u.role, u.allowed_locations, s.expires_at
        FROM sessions s
        JOIN users u ON u.guid = s.user_guid
        WHERE s.token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    let Some((guid, username, role, locations_json, expires_at)) = row else {
        return Ok(None);
    };

    let expires_at = DateTime::parse_from_rfc3339(&expires_at)
        .map_err(|e| Error::Internal(format!("Corrupt session expiry: {}", e)))?
        .with_timezone(&Utc);

    if expires_at < Utc::now() {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;
        return Ok(None);
    }

    let allowed_locations: Vec<String> = serde_json::from_str(&locations_json)
        .map_err(|e| Error::Internal(format!("Corrupt allowed_locations for '{}': {}", username, e)))?;

    Ok(Some(User {
        guid,
        username,
        role,
        allowed_locations,
    }))
}
