// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message filter and short-term window splitter.
//!
//! Every index used by the memory manager refers to a position in the
//! filtered sequence returned by [`text_turns`], never in the raw log.

use causerie_core::ChatMessage;

/// Keeps only plain-text messages, in order.
pub fn text_turns(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    messages
        .iter()
        .filter(|m| m.as_text().is_some())
        .cloned()
        .collect()
}

/// A filtered conversation split at the summarization boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window<'a> {
    /// Turns eligible for summarization: `[0, cutoff)`.
    pub older: &'a [ChatMessage],
    /// The last `min(size, total)` turns, verbatim.
    pub short_term: &'a [ChatMessage],
    /// `max(0, total - size)`.
    pub cutoff: usize,
}

impl Window<'_> {
    pub fn total(&self) -> usize {
        self.older.len() + self.short_term.len()
    }
}

/// Splits filtered turns into the summarizable prefix and the short-term suffix.
pub fn split(turns: &[ChatMessage], short_window_size: usize) -> Window<'_> {
    let cutoff = cutoff_index(turns.len(), short_window_size);
    let (older, short_term) = turns.split_at(cutoff);
    Window {
        older,
        short_term,
        cutoff,
    }
}

/// Boundary between summarizable turns and the protected short-term window.
pub fn cutoff_index(total: usize, short_window_size: usize) -> usize {
    total.saturating_sub(short_window_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn conversation(text_count: usize) -> Vec<ChatMessage> {
        (0..text_count)
            .map(|i| ChatMessage::user(format!("m{i}")))
            .collect()
    }

    #[test]
    fn rich_messages_are_filtered_out() {
        let messages = vec![
            ChatMessage::user("a"),
            ChatMessage::rich(serde_json::json!({"type": "weather"}), false),
            ChatMessage::assistant("b"),
        ];
        let turns = text_turns(&messages);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].as_text(), Some("b"));
    }

    #[test]
    fn empty_input_yields_empty_window() {
        let window = split(&[], 10);
        assert!(window.short_term.is_empty());
        assert!(window.older.is_empty());
        assert_eq!(window.cutoff, 0);
    }

    #[test]
    fn twenty_turns_window_ten() {
        let turns = conversation(20);
        let window = split(&turns, 10);
        assert_eq!(window.cutoff, 10);
        assert_eq!(window.short_term.len(), 10);
        assert_eq!(window.short_term[0].as_text(), Some("m10"));
        assert_eq!(window.older.last().and_then(|m| m.as_text()), Some("m9"));
    }

    #[test]
    fn windows_compare_by_content() {
        let turns = conversation(12);
        let copy = turns.clone();
        assert_eq!(split(&turns, 4), split(&copy, 4));
        assert_ne!(split(&turns, 4), split(&turns, 5));
    }

    #[test]
    fn short_conversation_is_all_short_term() {
        let turns = conversation(3);
        let window = split(&turns, 10);
        assert_eq!(window.cutoff, 0);
        assert_eq!(window.short_term.len(), 3);
    }

    proptest! {
        #[test]
        fn short_term_length_is_min_of_window_and_total(total in 0usize..64, size in 0usize..32) {
            let turns = conversation(total);
            let window = split(&turns, size);
            prop_assert_eq!(window.short_term.len(), size.min(total));
            prop_assert_eq!(window.cutoff, total.saturating_sub(size));
            prop_assert_eq!(window.total(), total);
        }
    }
}
