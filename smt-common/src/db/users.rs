//! User accounts and authentication
//!
//! An admin account is allowed every location; location accounts see only
//! their own. Passwords are stored as salted SHA-256 digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::{Error, Result};

/// Environment variable overriding the password given to seeded accounts
pub const DEFAULT_PASSWORD_ENV: &str = "SMT_DEFAULT_PASSWORD";

/// Locations provisioned on first run, one location account each
pub const DEFAULT_LOCATIONS: [&str; 6] = [
    "Huntington Beach",
    "Laguna Beach",
    "Costa Mesa",
    "Pleasanton",
    "Brentwood",
    "Alameda",
];

/// An authenticated account (no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub guid: String,
    pub username: String,
    pub role: String,
    pub allowed_locations: Vec<String>,
}

impl User {
    /// Whether this account may read or write the given location
    pub fn may_access(&self, location: &str) -> bool {
        self.allowed_locations.iter().any(|l| l == location)
    }
}

/// Create a user account
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: &str,
    allowed_locations: &[&str],
) -> Result<User> {
    let guid = Uuid::new_v4().to_string();
    let salt = Uuid::new_v4().simple().to_string();
    let hash = hash_password(&salt, password);
    let locations: Vec<String> = allowed_locations.iter().map(|l| l.to_string()).collect();
    let locations_json = serde_json::to_string(&locations)
        .map_err(|e| Error::Internal(format!("Failed to serialize locations: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO users (guid, username, password_hash, password_salt, role, allowed_locations)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(username)
    .bind(&hash)
    .bind(&salt)
    .bind(role)
    .bind(&locations_json)
    .execute(pool)
    .await?;

    Ok(User {
        guid,
        username: username.to_string(),
        role: role.to_string(),
        allowed_locations: locations,
    })
}

/// Verify a username/password pair.
///
/// Returns `None` for unknown usernames and wrong passwords alike; the
/// caller cannot tell which, and neither can the client.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    let row: Option<(String, String, String, String, String)> = sqlx::query_as(
        r#"
        SELECT guid, password_hash, password_salt, role, allowed_locations
        FROM users WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    let Some((guid, stored_hash, salt, role, locations_json)) = row else {
        return Ok(None);
    };

    if hash_password(&salt, password) != stored_hash {
        return Ok(None);
    }

    let allowed_locations: Vec<String> = serde_json::from_str(&locations_json)
        .map_err(|e| Error::Internal(format!("Corrupt allowed_locations for '{}': {}", username, e)))?;

    Ok(Some(User {
        guid,
        username: username.to_string(),
        role,
        allowed_locations,
    }))
}

/// Seed the default accounts on first run: one location account per
/// default location plus an admin allowed everywhere.
///
/// The seeded password comes from `SMT_DEFAULT_PASSWORD`, falling back to
/// "changeme"; operators are expected to override it.
pub async fn seed_default_users(pool: &SqlitePool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    let password =
        std::env::var(DEFAULT_PASSWORD_ENV).unwrap_or_else(|_| "changeme".to_string());

    for location in DEFAULT_LOCATIONS {
        let username = location_username(location);
        create_user(pool, &username, &password, "location", &[location]).await?;
    }

    create_user(pool, "admin", &password, "admin", &DEFAULT_LOCATIONS).await?;

    info!(
        "Seeded {} location accounts and one admin account",
        DEFAULT_LOCATIONS.len()
    );
    Ok(())
}

/// Account name for a location: first word, lower-cased ("Laguna Beach"
/// logs in as "laguna")
fn location_username(location: &str) -> String {
    location
        .split_whitespace()
        .next()
        .unwrap_or(location)
        .to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
