// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote summarization: prompt construction, the provider call and the
//! line-oriented response parser.

use std::sync::Arc;
use std::time::Duration;

use causerie_core::error::CauserieError;
use causerie_core::traits::ProviderAdapter;
use causerie_core::types::{ChatMessage, GenerationConfig, ProviderMessage, ProviderRequest};
use tracing::{debug, info};

use crate::state::SummarizeResult;
use crate::text::{collapse_whitespace, dedup_facts, truncate_chars};

/// System instruction for every summarization call.
pub const SYSTEM_PROMPT: &str = r#"Tu es un assistant chargé de résumer une conversation entre un utilisateur et un assistant.

Règles :
- Adopte un ton neutre et factuel.
- N'invente rien : appuie-toi uniquement sur les messages fournis.
- Ne donne aucun conseil ni recommandation qui n'a pas été demandé.
- Omets les données sensibles qui ne sont pas nécessaires (coordonnées, identifiants, santé).
- Les faits ne retiennent que des informations durables : préférences, contraintes, décisions, objectifs. Ignore les détails éphémères.
- Si un résumé précédent est fourni, intègre-le et mets-le à jour au lieu de le répéter.

Réponds exactement dans ce format :
Résumé: <quelques phrases>
Faits:
- <fait durable>
- <fait durable>"#;

/// Facts kept from one response.
pub const MAX_FACTS: usize = 12;
/// Cap on the summary when the response has no recognizable structure.
pub const MAX_RAW_SUMMARY_CHARS: usize = 500;
/// Default bound on one call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Turns to summarize plus the long-term memory they continue.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub turns: &'a [ChatMessage],
    pub previous_summary: Option<&'a str>,
    pub previous_facts: &'a [String],
}

/// Calls a [`ProviderAdapter`] to summarize conversation turns.
#[derive(Clone)]
pub struct Summarizer {
    provider: Arc<dyn ProviderAdapter>,
    model: String,
    generation: GenerationConfig,
    timeout: Duration,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn ProviderAdapter>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            generation: GenerationConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the provider request for `input`.
    pub fn build_request(&self, input: &SummaryInput<'_>) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            messages: vec![ProviderMessage {
                role: "user".to_string(),
                content: build_user_prompt(input),
            }],
            generation: self.generation,
        }
    }

    /// Runs one summarization call.
    ///
    /// Fails on provider errors, on timeout and on an empty or
    /// whitespace-only response. A non-empty response always parses.
    pub async fn summarize(
        &self,
        input: &SummaryInput<'_>,
    ) -> Result<SummarizeResult, CauserieError> {
        let request = self.build_request(input);
        debug!(
            model = %self.model,
            turns = input.turns.len(),
            has_previous = input.previous_summary.is_some(),
            "sending summarization request"
        );

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| CauserieError::Timeout {
                duration: self.timeout,
            })??;

        if response.content.trim().is_empty() {
            return Err(CauserieError::Summarization(
                "provider returned an empty response".into(),
            ));
        }

        let result = parse_summary_response(&response.content);
        info!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            facts = result.facts.len(),
            "summary generated"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn build_user_prompt(input: &SummaryInput<'_>) -> String {
    let mut prompt = String::new();

    if let Some(summary) = input.previous_summary.filter(|s| !s.trim().is_empty()) {
        prompt.push_str("Résumé précédent :\n");
        prompt.push_str(summary.trim());
        prompt.push_str("\n\n");
    }
    if !input.previous_facts.is_empty() {
        prompt.push_str("Faits déjà connus :\n");
        for fact in input.previous_facts {
            prompt.push_str("- ");
            prompt.push_str(fact);
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str("Messages à résumer :\n");
    for turn in input.turns {
        let Some(text) = turn.as_text() else {
            continue;
        };
        let speaker = if turn.is_user { "Utilisateur" } else { "Assistant" };
        prompt.push_str(speaker);
        prompt.push_str(" : ");
        prompt.push_str(text.trim());
        prompt.push('\n');
    }
    prompt
}

// --- Response parsing ---

const SUMMARY_LABELS: &[&str] = &["resume"];
const FACTS_LABELS: &[&str] = &["faits cles", "faits"];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Summary,
    Facts,
}

/// Parses a `Résumé: … / Faits: - …` response.
///
/// The summary label is case-insensitive, accents are optional and markdown
/// emphasis around labels is ignored. Lines after the summary label are
/// joined with spaces; bullets (`-`, `•`, `*`) after the facts label become
/// facts, deduplicated in order and capped at [`MAX_FACTS`]. A response with
/// no recognizable label becomes the summary as-is (capped at
/// [`MAX_RAW_SUMMARY_CHARS`]) with no facts.
pub fn parse_summary_response(raw: &str) -> SummarizeResult {
    let mut section = Section::Preamble;
    let mut labelled = false;
    let mut summary_parts: Vec<&str> = Vec::new();
    let mut facts: Vec<&str> = Vec::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = label_value(line, SUMMARY_LABELS) {
            section = Section::Summary;
            labelled = true;
            if !rest.is_empty() {
                summary_parts.push(rest);
            }
            continue;
        }
        if let Some(rest) = label_value(line, FACTS_LABELS) {
            section = Section::Facts;
            labelled = true;
            if !rest.is_empty() {
                facts.push(bullet(rest).unwrap_or(rest));
            }
            continue;
        }

        match section {
            Section::Summary => summary_parts.push(line),
            Section::Facts => {
                if let Some(fact) = bullet(line) {
                    facts.push(fact);
                }
            }
            Section::Preamble => {}
        }
    }

    let summary = collapse_whitespace(&summary_parts.join(" "));
    let facts = dedup_facts(facts, MAX_FACTS);

    if !labelled || (summary.is_empty() && facts.is_empty()) {
        return SummarizeResult {
            summary: truncate_chars(raw.trim(), MAX_RAW_SUMMARY_CHARS),
            facts: Vec::new(),
        };
    }

    SummarizeResult { summary, facts }
}

fn is_decoration(c: char) -> bool {
    matches!(c, '#' | '*' | '_') || c.is_whitespace()
}

/// If `line` starts with one of `labels` followed by a colon, returns the
/// text after the colon.
fn label_value<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    let body = line.trim_start_matches(is_decoration);
    labels.iter().find_map(|label| {
        let rest = strip_prefix_folded(body, label)?;
        let rest = rest.trim_start_matches(is_decoration).strip_prefix(':')?;
        Some(rest.trim_matches(is_decoration))
    })
}

fn fold(c: char) -> char {
    match c.to_lowercase().next().unwrap_or(c) {
        'é' | 'è' | 'ê' | 'ë' => 'e',
        other => other,
    }
}

/// Case- and accent-insensitive `strip_prefix`.
fn strip_prefix_folded<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut end = 0;
    let mut chars = text.chars();
    for expected in prefix.chars() {
        let c = chars.next()?;
        if fold(c) != fold(expected) {
            return None;
        }
        end += c.len_utf8();
    }
    Some(&text[end..])
}

fn bullet(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))
        .or_else(|| line.strip_prefix('*'))?;
    let fact = rest.trim();
    (!fact.is_empty()).then_some(fact)
}
