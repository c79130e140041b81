// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! String helpers shared by the parser, the fallback and the fact lists.

use std::collections::HashSet;

/// Replaces every run of whitespace with a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `max_chars` characters, ending with `…` when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Trims, drops empty entries and duplicates (first occurrence wins), and
/// keeps at most `cap` entries.
pub fn dedup_facts<I, S>(facts: I, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for fact in facts {
        if out.len() >= cap {
            break;
        }
        let fact = fact.as_ref().trim();
        if fact.is_empty() || !seen.insert(fact.to_string()) {
            continue;
        }
        out.push(fact.to_string());
    }
    out
}

/// Set union preserving order: `existing` first, then unseen `incoming` entries.
pub fn union_facts(existing: &[String], incoming: &[String]) -> Vec<String> {
    dedup_facts(existing.iter().chain(incoming.iter()), usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_normalizes_runs() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("été", 5), "été");
        assert_eq!(truncate_chars("éééééé", 4), "ééé…");
        assert_eq!(truncate_chars("éééééé", 4).chars().count(), 4);
    }

    #[test]
    fn dedup_keeps_first_occurrence_and_caps() {
        let facts = dedup_facts(["b", " a", "b", "", "c", "a "], 10);
        assert_eq!(facts, vec!["b", "a", "c"]);
        assert_eq!(dedup_facts(["1", "2", "3"], 2), vec!["1", "2"]);
    }

    #[test]
    fn union_appends_only_new_facts() {
        let existing = vec!["x".to_string(), "y".to_string()];
        let incoming = vec!["y".to_string(), "z".to_string()];
        assert_eq!(union_facts(&existing, &incoming), vec!["x", "y", "z"]);
    }
}
