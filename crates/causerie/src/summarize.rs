// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `causerie summarize` command implementation.
//!
//! Loads a transcript, runs one summarization cycle and prints the
//! long-term context followed by the short-term window.

use std::fmt::Write as _;
use std::path::Path;

use causerie_config::model::CauserieConfig;
use causerie_core::{CauserieError, ChatMessage, MessageBody};
use causerie_memory::{MemoryView, SummarizeOutcome};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

/// One transcript entry. `id` and `timestamp` are optional on input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranscriptEntry {
    #[serde(default)]
    id: Option<String>,
    text: MessageBody,
    is_user: bool,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    image_url: Option<String>,
}

impl From<TranscriptEntry> for ChatMessage {
    fn from(entry: TranscriptEntry) -> Self {
        let mut message = match entry.text {
            MessageBody::Text(text) if entry.is_user => ChatMessage::user(text),
            MessageBody::Text(text) => ChatMessage::assistant(text),
            MessageBody::Rich(payload) => ChatMessage::rich(payload, entry.is_user),
        };
        if let Some(id) = entry.id {
            message.id = id;
        }
        if let Some(timestamp) = entry.timestamp {
            message.timestamp = timestamp;
        }
        message.image_url = entry.image_url;
        message
    }
}

/// Runs the `causerie summarize` command.
pub async fn run_summarize(
    config: &CauserieConfig,
    path: &Path,
    force: bool,
    offline: bool,
) -> Result<(), CauserieError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CauserieError::Storage {
        source: Box::new(e),
    })?;
    let messages = parse_transcript(&raw)?;
    info!(path = %path.display(), messages = messages.len(), "transcript loaded");

    let memory = crate::memory_builder(config, messages, offline).build()?;
    let outcome = if force {
        memory.force_summarize().await
    } else {
        memory.summarize_if_needed().await
    };

    print!("{}", render_report(&outcome, &memory.view()));
    match outcome {
        SummarizeOutcome::Failed(message) => Err(CauserieError::Summarization(message)),
        _ => Ok(()),
    }
}

/// Parses a JSON array of messages.
pub fn parse_transcript(raw: &str) -> Result<Vec<ChatMessage>, CauserieError> {
    let entries: Vec<TranscriptEntry> = serde_json::from_str(raw)
        .map_err(|e| CauserieError::Config(format!("invalid transcript: {e}")))?;
    Ok(entries.into_iter().map(ChatMessage::from).collect())
}

/// Plain-text report of one cycle and the resulting memory view.
pub fn render_report(outcome: &SummarizeOutcome, view: &MemoryView) -> String {
    let mut out = String::new();

    let _ = match outcome {
        SummarizeOutcome::Committed {
            mode,
            source,
            summarized_until,
        } => writeln!(
            out,
            "{mode} summarization committed ({source}), turns 0..={summarized_until} folded into long-term memory"
        ),
        SummarizeOutcome::Skipped(reason) => writeln!(out, "summarization skipped: {reason}"),
        SummarizeOutcome::Superseded => writeln!(out, "summarization result discarded"),
        SummarizeOutcome::Failed(message) => writeln!(out, "summarization failed: {message}"),
    };

    out.push('\n');
    if view.long_term_context_text.is_empty() {
        out.push_str("(no long-term memory)\n");
    } else {
        out.push_str(&view.long_term_context_text);
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "\nShort-term window ({} of {} turns):",
        view.short_count, view.total_count
    );
    for message in &view.short_term_messages {
        let speaker = if message.is_user { "user" } else { "assistant" };
        let _ = writeln!(out, "[{speaker}] {}", message.as_text().unwrap_or_default());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use causerie_config::model::MemoryConfig;
    use causerie_memory::HybridMemory;

    const TRANSCRIPT: &str = r#"[
        {"id": "a", "text": "Je préfère voyager en train.", "isUser": true},
        {"text": "Très bien, c'est noté.", "isUser": false, "timestamp": "2026-03-01T10:00:00Z"},
        {"text": {"card": "itinéraire"}, "isUser": false},
        {"text": "Mon budget est de 800 euros.", "isUser": true}
    ]"#;

    #[test]
    fn transcript_accepts_optional_fields() {
        let messages = parse_transcript(TRANSCRIPT).unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].id, "a");
        assert!(messages[0].is_user);
        assert_eq!(
            messages[1].timestamp.to_rfc3339(),
            "2026-03-01T10:00:00+00:00"
        );
        assert!(messages[2].as_text().is_none());
        assert_eq!(messages[3].as_text(), Some("Mon budget est de 800 euros."));
    }

    #[test]
    fn malformed_transcript_is_rejected() {
        assert!(matches!(
            parse_transcript("{\"not\": \"an array\"}"),
            Err(CauserieError::Config(_))
        ));
    }

    #[tokio::test]
    async fn forced_local_run_renders_context_and_window() {
        let config = MemoryConfig {
            auto_summarize: false,
            short_window_size: 2,
            ..MemoryConfig::default()
        };
        let memory = HybridMemory::builder(&config)
            .messages(parse_transcript(TRANSCRIPT).unwrap())
            .build()
            .unwrap();

        let outcome = memory.force_summarize().await;
        let report = render_report(&outcome, &memory.view());

        assert!(report.starts_with("force summarization committed (fallback)"));
        assert!(report.contains("Mémoire de la conversation"));
        assert!(report.contains("- Mon budget est de 800 euros."));
        assert!(report.contains("Short-term window (2 of 3 turns):"));
        assert!(report.contains("[assistant] Très bien, c'est noté."));
        assert!(report.ends_with("[user] Mon budget est de 800 euros.\n"));
    }

    #[tokio::test]
    async fn offline_run_reads_transcript_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        std::fs::write(&path, TRANSCRIPT).unwrap();

        let config = CauserieConfig::default();
        assert!(run_summarize(&config, &path, true, true).await.is_ok());
        assert!(matches!(
            run_summarize(&config, &dir.path().join("missing.json"), false, true).await,
            Err(CauserieError::Storage { .. })
        ));
    }

    #[test]
    fn skipped_run_reports_reason() {
        let memory = HybridMemory::builder(&MemoryConfig::default()).build().unwrap();
        let report = render_report(
            &SummarizeOutcome::Skipped(causerie_memory::SkipReason::Empty),
            &memory.view(),
        );
        assert!(report.starts_with("summarization skipped: empty"));
        assert!(report.contains("(no long-term memory)"));
    }
}
