// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term context block injected into downstream prompts.

/// First line of a non-empty block.
pub const HEADER: &str = "Mémoire de la conversation (messages antérieurs) :";

/// Renders summary and facts, or returns an empty string when both are empty.
pub fn render_long_term_context(summary: &str, facts: &[String]) -> String {
    let summary = summary.trim();
    let facts: Vec<&str> = facts
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();

    if summary.is_empty() && facts.is_empty() {
        return String::new();
    }

    let mut lines = vec![HEADER.to_string()];
    if !summary.is_empty() {
        lines.push(format!("Résumé: {summary}"));
    }
    if !facts.is_empty() {
        lines.push("Faits clés:".to_string());
        lines.extend(facts.iter().map(|f| format!("- {f}")));
    }
    lines.join("\n")
}
