// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use causerie_core::{AdapterType, CauserieError, HealthStatus, KeyValueStore, PluginAdapter};
use tokio::sync::RwLock;

/// A [`KeyValueStore`] backed by a `HashMap`. Contents live as long as the
/// value; useful for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl PluginAdapter for MemoryKvStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CauserieError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CauserieError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CauserieError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CauserieError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CauserieError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryKvStore::new();
        assert!(store.get("a").await.unwrap().is_none());

        store.set("a", "1").await.unwrap();
        store.set("a", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.len().await, 1);

        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let store = MemoryKvStore::new();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.clear().await.unwrap();
        assert!(store.get("b").await.unwrap().is_none());
    }
}
