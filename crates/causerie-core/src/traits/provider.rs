// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for generative text APIs.

use async_trait::async_trait;

use crate::error::CauserieError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for generative text providers.
///
/// The memory manager only needs single-shot completion: one request in,
/// one freeform text response out.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, CauserieError>;
}
