// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and health shared by providers and key-value stores.

use async_trait::async_trait;

use crate::error::CauserieError;
use crate::types::{AdapterType, HealthStatus};

/// Supertrait of [`crate::ProviderAdapter`] and [`crate::KeyValueStore`].
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Name used in logs and `Debug` output, e.g. `"gemini"` or `"sqlite"`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Cheap reachability probe; must not mutate state.
    async fn health_check(&self) -> Result<HealthStatus, CauserieError>;
}
