// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Causerie.
//!
//! Provides the error type, the conversation and provider types, and the
//! adapter traits implemented by the Gemini provider and the persistence
//! backends.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CauserieError;
pub use types::{
    AdapterType, ChatMessage, ConversationId, HealthStatus, MemoryStatus, MessageBody,
};

pub use traits::{KeyValueStore, PluginAdapter, ProviderAdapter};
