// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline summarizer.
//!
//! Deterministic and infallible: no network, no I/O. Used when the remote
//! call fails, times out, returns nothing, or the memory is offline.

use std::sync::Arc;

use causerie_core::ChatMessage;

use crate::classifier::{Classifier, FactKind, FactPatterns};
use crate::state::SummarizeResult;
use crate::text::{collapse_whitespace, dedup_facts, truncate_chars};

/// Default number of trailing turns read.
pub const DEFAULT_TURNS: usize = 12;
/// Sentences kept as the summary.
pub const SUMMARY_SENTENCES: usize = 4;
/// Maximum characters per extracted fact, ellipsis included.
pub const MAX_FACT_CHARS: usize = 180;
/// Maximum number of extracted facts.
pub const MAX_FACTS: usize = 8;

/// Heuristic summarizer over the last few turns.
#[derive(Clone)]
pub struct FallbackSummarizer {
    classifier: Arc<dyn Classifier<Label = FactKind>>,
    turns: usize,
}

impl FallbackSummarizer {
    pub fn new(classifier: Arc<dyn Classifier<Label = FactKind>>, turns: usize) -> Self {
        Self {
            classifier,
            turns: turns.max(1),
        }
    }

    /// Summarizes the last `turns` messages of `messages`.
    pub fn summarize(&self, messages: &[ChatMessage]) -> SummarizeResult {
        let start = messages.len().saturating_sub(self.turns);
        let joined = messages[start..]
            .iter()
            .filter_map(ChatMessage::as_text)
            .collect::<Vec<_>>()
            .join(" ");
        let text = collapse_whitespace(&joined);
        let sentences = split_sentences(&text);

        let summary = sentences
            .iter()
            .take(SUMMARY_SENTENCES)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let candidates = sentences
            .iter()
            .filter(|s| self.classifier.classify(s).is_some())
            .map(|s| truncate_chars(s, MAX_FACT_CHARS));

        SummarizeResult {
            summary,
            facts: dedup_facts(candidates, MAX_FACTS),
        }
    }
}

impl Default for FallbackSummarizer {
    fn default() -> Self {
        Self::new(Arc::new(FactPatterns::french()), DEFAULT_TURNS)
    }
}

impl std::fmt::Debug for FallbackSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackSummarizer")
            .field("turns", &self.turns)
            .finish_non_exhaustive()
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

/// Splits text after `.`, `!`, `?` or `…` when followed by whitespace.
/// Runs of terminal punctuation ("?!", "...") stay with their sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }
        if let Some(&(_, next)) = chars.peek()
            && next.is_whitespace()
        {
            let end = idx + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}
