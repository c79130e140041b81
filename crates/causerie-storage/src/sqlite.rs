// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite key-value store.
//!
//! All statements run on tokio-rusqlite's single background thread; one
//! `kv` table holds every key.

use std::path::Path;

use async_trait::async_trait;
use causerie_config::model::StorageConfig;
use causerie_core::{AdapterType, CauserieError, HealthStatus, KeyValueStore, PluginAdapter};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// Convert a tokio-rusqlite error into CauserieError::Storage.
fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> CauserieError {
    CauserieError::Storage {
        source: Box::new(e),
    }
}

/// A [`KeyValueStore`] persisted in a SQLite database file.
pub struct SqliteKvStore {
    conn: tokio_rusqlite::Connection,
}

impl SqliteKvStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub async fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, CauserieError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CauserieError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| CauserieError::Storage {
                source: Box::new(e),
            })?;
        let store = Self { conn };
        store.initialize(wal_mode).await?;
        debug!(path = %path.display(), wal_mode, "SQLite key-value store opened");
        Ok(store)
    }

    /// Opens the store described by the `[storage]` configuration section.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, CauserieError> {
        Self::open(&config.database_path, config.wal_mode).await
    }

    /// A throwaway in-memory database.
    pub async fn open_in_memory() -> Result<Self, CauserieError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| CauserieError::Storage {
                source: Box::new(e),
            })?;
        let store = Self { conn };
        store.initialize(false).await?;
        Ok(store)
    }

    async fn initialize(&self, wal_mode: bool) -> Result<(), CauserieError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal_mode {
                    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
                }
                conn.execute_batch("PRAGMA busy_timeout=5000;")?;
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// All stored keys with the given prefix, sorted.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CauserieError> {
        let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare("SELECT key FROM kv WHERE key LIKE ?1 ESCAPE '\\' ORDER BY key")?;
                let keys = stmt
                    .query_map(params![pattern], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteKvStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CauserieError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CauserieError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT value FROM kv WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CauserieError> {
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                    updated_at = excluded.updated_at",
                    params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn remove(&self, key: &str) -> Result<(), CauserieError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn clear(&self) -> Result<(), CauserieError> {
        self.conn
            .call(|conn| {
                conn.execute("DELETE FROM kv", [])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_round_trip() {
        let store = SqliteKvStore::open_in_memory().await.unwrap();
        assert!(store.get("missing").await.unwrap().is_none());

        store.set("facts", "[\"a\"]").await.unwrap();
        store.set("facts", "[\"b\"]").await.unwrap();
        assert_eq!(store.get("facts").await.unwrap().as_deref(), Some("[\"b\"]"));

        store.remove("facts").await.unwrap();
        assert!(store.get("facts").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kv.db");

        {
            let store = SqliteKvStore::open(&path, true).await.unwrap();
            store.set("k", "v").await.unwrap();
        }

        let store = SqliteKvStore::open(&path, true).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn clear_and_prefix_listing() {
        let store = SqliteKvStore::open_in_memory().await.unwrap();
        store.set("facts:c1", "[]").await.unwrap();
        store.set("facts:c2", "[]").await.unwrap();
        store.set("prefs", "{}").await.unwrap();

        let keys = store.keys_with_prefix("facts:").await.unwrap();
        assert_eq!(keys, vec!["facts:c1", "facts:c2"]);

        store.clear().await.unwrap();
        assert!(store.keys_with_prefix("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn from_config_uses_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("c.db").display().to_string(),
            wal_mode: false,
        };
        let store = SqliteKvStore::from_config(&config).await.unwrap();
        store.set("x", "1").await.unwrap();
        assert!(dir.path().join("c.db").exists());
    }
}
