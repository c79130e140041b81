// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value persistence port.

use async_trait::async_trait;

use crate::error::CauserieError;
use crate::traits::adapter::PluginAdapter;

/// String key-value store used for small pieces of durable client state
/// (pinned facts, preferences).
///
/// Values are opaque strings; callers serialize with serde_json.
#[async_trait]
pub trait KeyValueStore: PluginAdapter {
    /// Reads a value. Returns `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, CauserieError>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), CauserieError>;

    /// Removes a single key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), CauserieError>;

    /// Removes every key in the store.
    async fn clear(&self) -> Result<(), CauserieError>;
}
