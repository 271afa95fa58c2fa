//! # Key-Value Repository
//!
//! Namespaced string storage on top of the `kv_store` table.
//!
//! ## Key Operations
//! - `get` / `get_entry`: read one value
//! - `put`: insert or overwrite (upsert)
//! - `delete`: remove one key
//! - `keys`: list a namespace
//!
//! Values are opaque text; typed stores such as
//! [`CartRepository`](crate::repository::cart::CartRepository) encode on top.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// One stored row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct KvEntry {
    pub namespace: String,
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for the namespaced key-value store.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Reads the value stored at `namespace`/`key`.
    pub async fn get(&self, namespace: &str, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM kv_store WHERE namespace = ?1 AND key = ?2",
        )
        .bind(namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Reads the full row stored at `namespace`/`key`.
    pub async fn get_entry(&self, namespace: &str, key: &str) -> DbResult<Option<KvEntry>> {
        let entry = sqlx::query_as::<_, KvEntry>(
            r#"
            SELECT namespace, key, value, updated_at
            FROM kv_store
            WHERE namespace = ?1 AND key = ?2
            "#,
        )
        .bind(namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Stores `value`, replacing whatever was there.
    pub async fn put(&self, namespace: &str, key: &str, value: &str) -> DbResult<()> {
        debug!(namespace = %namespace, key = %key, bytes = value.len(), "Writing value");

        sqlx::query(
            r#"
            INSERT INTO kv_store (namespace, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (namespace, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(namespace)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes `namespace`/`key`. Returns whether a row existed.
    pub async fn delete(&self, namespace: &str, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE namespace = ?1 AND key = ?2")
            .bind(namespace)
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(namespace = %namespace, key = %key, removed = result.rows_affected(), "Deleted value");
        Ok(result.rows_affected() > 0)
    }

    /// Lists the keys of a namespace in ascending order.
    pub async fn keys(&self, namespace: &str) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>(
            "SELECT key FROM kv_store WHERE namespace = ?1 ORDER BY key ASC",
        )
        .bind(namespace)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
