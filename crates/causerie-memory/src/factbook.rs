// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pinned facts persisted through a [`KeyValueStore`].
//!
//! The book stores one JSON array per namespace. It does not touch the
//! in-memory state of a [`crate::HybridMemory`]; callers merge pinned facts
//! with `set_facts` when they want them in the rendered context.

use std::sync::Arc;

use causerie_core::{CauserieError, KeyValueStore};
use tracing::debug;

use crate::text::dedup_facts;

/// Durable list of user-pinned facts.
#[derive(Clone)]
pub struct FactBook {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl FactBook {
    /// Prefix shared by every book's storage key.
    pub const KEY_PREFIX: &str = "causerie:facts:";

    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            store,
            key: format!("{}{namespace}", Self::KEY_PREFIX),
        }
    }

    /// Namespace encoded in a book key, `None` for other keys.
    pub fn namespace_of(key: &str) -> Option<&str> {
        key.strip_prefix(Self::KEY_PREFIX)
    }

    /// Storage key of this book.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Pinned facts in pin order. Missing key means no facts.
    pub async fn load(&self) -> Result<Vec<String>, CauserieError> {
        match self.store.get(&self.key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(storage_err),
            None => Ok(Vec::new()),
        }
    }

    /// Adds `fact`. Returns false when it is blank or already pinned.
    pub async fn pin(&self, fact: &str) -> Result<bool, CauserieError> {
        let fact = fact.trim();
        if fact.is_empty() {
            return Ok(false);
        }
        let mut facts = self.load().await?;
        if facts.iter().any(|f| f == fact) {
            return Ok(false);
        }
        facts.push(fact.to_string());
        self.save(&facts).await?;
        debug!(key = %self.key, count = facts.len(), "fact pinned");
        Ok(true)
    }

    /// Removes `fact`. Returns false when it was not pinned.
    pub async fn unpin(&self, fact: &str) -> Result<bool, CauserieError> {
        let fact = fact.trim();
        let mut facts = self.load().await?;
        let before = facts.len();
        facts.retain(|f| f != fact);
        if facts.len() == before {
            return Ok(false);
        }
        self.save(&facts).await?;
        debug!(key = %self.key, count = facts.len(), "fact unpinned");
        Ok(true)
    }

    /// Drops every pinned fact of this namespace.
    pub async fn clear(&self) -> Result<(), CauserieError> {
        self.store.remove(&self.key).await
    }

    async fn save(&self, facts: &[String]) -> Result<(), CauserieError> {
        let facts = dedup_facts(facts, usize::MAX);
        let raw = serde_json::to_string(&facts).map_err(storage_err)?;
        self.store.set(&self.key, &raw).await
    }
}

impl std::fmt::Debug for FactBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactBook")
            .field("key", &self.key)
            .field("store", &self.store.name())
            .finish()
    }
}

fn storage_err(e: serde_json::Error) -> CauserieError {
    CauserieError::Storage {
        source: Box::new(e),
    }
}
