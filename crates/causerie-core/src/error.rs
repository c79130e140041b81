// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Causerie.

use thiserror::Error;

/// The primary error type used across Causerie adapter traits and memory operations.
#[derive(Debug, Error)]
pub enum CauserieError {
    /// Configuration errors (invalid TOML, missing API key, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generative text provider errors (API failure, malformed body, empty candidates).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A summarization cycle produced nothing usable.
    #[error("summarization failed: {0}")]
    Summarization(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CauserieError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}
