//! # Snapshot Repository
//!
//! Key→JSON blobs of reference data (product and inventory lists) kept so
//! the point-of-sale UI can operate while disconnected.
//!
//! Blobs are overwritten wholesale on each write; there are no partial
//! updates. A blob that fails to parse on read is treated as absent, never
//! as an error.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;

/// Repository for offline reference-data snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Stores a snapshot under `key`, replacing any previous blob.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let payload = serde_json::to_string(value)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO offline_snapshots (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET payload = ?2, updated_at = ?3
            "#,
        )
        .bind(key)
        .bind(&payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key, bytes = payload.len(), "Stored snapshot");
        Ok(())
    }

    /// Loads the snapshot stored under `key`.
    ///
    /// Missing keys and unreadable blobs both come back as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM offline_snapshots WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable snapshot");
                Ok(None)
            }
        }
    }

    /// Removes the snapshot stored under `key`. Idempotent.
    pub async fn delete(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM offline_snapshots WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes every snapshot.
    pub async fn clear(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM offline_snapshots")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// True when at least one snapshot is stored.
    pub async fn has_any(&self) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offline_snapshots")
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
