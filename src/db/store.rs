//! Key-value persistence for JSON collections.
//!
//! Repositories never touch a backend directly; they go through [`PersistedStore`],
//! which owns the JSON encoding and the load-or-seed policy.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;

use crate::errors::AppError;

/// Logical storage keys.
pub mod keys {
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";
    pub const MEMBERS: &str = "members";
    pub const PACKAGES: &str = "packages";
}

/// Durable string storage addressed by key.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Replace the value stored under `key`. Must be durable when it returns.
    async fn write(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// SQLite-backed storage using a single `kv_store` table.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE \
             SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory storage for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Typed JSON view over a [`Storage`] backend.
#[derive(Clone)]
pub struct PersistedStore {
    backend: Arc<dyn Storage>,
}

impl PersistedStore {
    pub fn new(backend: Arc<dyn Storage>) -> Self {
        Self { backend }
    }

    /// Store backed by a fresh [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Load and decode the value under `key`, or `None` if it was never stored.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.backend.read(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)?;
        self.backend.write(key, &raw).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.backend.remove(key).await
    }

    /// Load `key`, or persist and return `seed()` if nothing was ever stored.
    ///
    /// Existing data always wins, including an empty collection.
    pub async fn load_or_seed<T, F>(&self, key: &str, seed: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(existing) = self.load(key).await? {
            return Ok(existing);
        }

        let seeded = seed();
        self.save(key, &seeded).await?;
        tracing::info!("Seeded storage key {:?}", key);
        Ok(seeded)
    }
}
