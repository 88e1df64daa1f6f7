//! JSON key-value store backed by the `kv_store` table

use serde::{de::DeserializeOwned, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Per-item settings map, keyed by item name
pub const ITEM_SETTINGS_KEY: &str = "itemSettings";
/// Weeks of cover to order for
pub const TARGET_WEEKS_KEY: &str = "targetWeeks";
/// Default supplier names
pub const SUPPLIERS_KEY: &str = "suppliers";
/// Wastage log entries
pub const WASTAGE_LOG_KEY: &str = "wastageLog";
/// Staff notes
pub const BAR_NOTES_KEY: &str = "barNotes";

/// Typed access to JSON values stored by key
#[derive(Clone)]
pub struct KvStore {
    db: PgPool,
}

impl KvStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Read a value, `None` when the key has never been written
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let value = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT value FROM kv_store WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::StorageError(format!("failed to read {}: {}", key, e)))?;

        match value {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| AppError::StorageError(format!("malformed value for {}: {}", key, e))),
        }
    }

    /// Read a value, falling back to `T::default()` on a missing key or any
    /// read failure
    pub async fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("{}; defaults used", e);
                T::default()
            }
        }
    }

    /// Read-modify-write a value under a row lock.
    ///
    /// `apply` sees the current value (or `T::default()`) and may change it.
    /// The new value is written only when `apply` succeeds; concurrent
    /// updates of the same key wait for each other.
    pub async fn update<T, R, F>(&self, key: &str, apply: F) -> AppResult<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> AppResult<R>,
    {
        let storage_err = |e: sqlx::Error| AppError::StorageError(format!("failed to update {}: {}", key, e));

        let mut tx = self.db.begin().await.map_err(storage_err)?;

        // Make sure there is a row to lock
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES ($1, 'null'::jsonb, NOW())
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        let stored = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT value FROM kv_store WHERE key = $1 FOR UPDATE",
        )
        .bind(key)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;

        let mut value: T = match stored {
            serde_json::Value::Null => T::default(),
            stored => serde_json::from_value(stored)
                .map_err(|e| AppError::StorageError(format!("malformed value for {}: {}", key, e)))?,
        };

        let result = apply(&mut value)?;

        let encoded = serde_json::to_value(&value)
            .map_err(|e| AppError::Internal(format!("failed to encode {}: {}", key, e)))?;
        sqlx::query("UPDATE kv_store SET value = $2, updated_at = NOW() WHERE key = $1")
            .bind(key)
            .bind(encoded)
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;

        tracing::debug!("Updated {}", key);
        Ok(result)
    }

    /// Write a value, replacing any previous one
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Internal(format!("failed to encode {}: {}", key, e)))?;

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.db)
        .await
        .map_err(|e| AppError::StorageError(format!("failed to write {}: {}", key, e)))?;

        tracing::debug!("Stored {}", key);
        Ok(())
    }
}
