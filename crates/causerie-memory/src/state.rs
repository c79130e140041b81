// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory state and the consumer-facing snapshot.

use causerie_core::{ChatMessage, MemoryStatus};
use serde::{Deserialize, Serialize};

/// Long-term memory of one conversation.
///
/// `summarized_until` is an index into the filtered text turns; `None` means
/// nothing has been summarized yet. It stays below the number of text turns
/// and only moves forward, except that a forced run sets it to the last turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryState {
    pub status: MemoryStatus,
    pub summary: String,
    /// Ordered, deduplicated.
    pub facts: Vec<String>,
    pub summarized_until: Option<usize>,
    pub error: Option<String>,
}

impl MemoryState {
    /// True when there is something to render as long-term context.
    pub fn has_long_term(&self) -> bool {
        !self.summary.trim().is_empty() || !self.facts.is_empty()
    }
}

/// Parsed output of one summarization call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResult {
    pub summary: String,
    pub facts: Vec<String>,
}

impl SummarizeResult {
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty() && self.facts.is_empty()
    }
}

/// Read-only snapshot handed to a chat view or prompt builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryView {
    pub status: MemoryStatus,
    pub error: Option<String>,
    pub summary: String,
    pub facts: Vec<String>,
    pub short_term_messages: Vec<ChatMessage>,
    pub long_term_context_text: String,
    pub total_count: usize,
    pub short_count: usize,
    /// Past the threshold and some long-term memory exists.
    pub optimized: bool,
    pub summarized_until: Option<usize>,
}
