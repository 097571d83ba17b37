//! Member store
//!
//! Rosters are stored one member per row, keyed by location. Replacing a
//! location's roster is a single transaction: readers either see the old
//! set or the new set, never a half-replaced one.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::record::MemberRecord;
use crate::{Error, Result};

/// Load the stored roster for a location, empty if none stored
pub async fn load_for_location(pool: &SqlitePool, location: &str) -> Result<Vec<MemberRecord>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT data FROM members WHERE location = ? ORDER BY rowid")
            .bind(location)
            .fetch_all(pool)
            .await?;

    rows.iter()
        .map(|(data,)| {
            serde_json::from_str(data)
                .map_err(|e| Error::Internal(format!("Corrupt member record: {}", e)))
        })
        .collect()
}

/// Atomically replace the stored roster for a location.
///
/// All-or-nothing: on any failure the transaction rolls back and the
/// previous roster remains intact.
pub async fn replace_all(
    pool: &SqlitePool,
    location: &str,
    records: &[MemberRecord],
) -> Result<()> {
    // Serialize everything before touching the database
    let mut rows: Vec<(String, String, String)> = Vec::with_capacity(records.len());
    for record in records {
        let data = serde_json::to_string(record)
            .map_err(|e| Error::Internal(format!("Failed to serialize member: {}", e)))?;
        rows.push((Uuid::new_v4().to_string(), row_key(record), data));
    }
    let updated_at = Utc::now().to_rfc3339();

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM members WHERE location = ?")
        .bind(location)
        .execute(&mut *tx)
        .await?;

    for (guid, member_key, data) in &rows {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO members (guid, location, member_key, data, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(guid)
        .bind(location)
        .bind(member_key)
        .bind(data)
        .bind(&updated_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Row key for storage uniqueness; records with no fields at all get a
/// random key so they can still be stored
fn row_key(record: &MemberRecord) -> String {
    let key = record.composite_key();
    if key.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        key
    }
}
