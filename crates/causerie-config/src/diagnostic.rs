// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for configuration failures.
//!
//! Figment reports unknown keys, missing keys and type mismatches. Each one
//! becomes a [`ConfigError`]; unknown keys are located in the TOML text they
//! came from and get a "did you mean" hint ranked by Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity a known key needs before it is offered as a correction.
const MIN_SIMILARITY: f64 = 0.75;

/// TOML text a configuration layer was read from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Display name, matched against the file path Figment records.
    pub name: String,
    pub content: String,
}

impl ConfigSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("`{key}` is not a known configuration key")]
    #[diagnostic(
        code(causerie::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), known))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Keys accepted at this level, comma separated.
        known: String,
        #[label("unknown key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(causerie::config::invalid_type), help("use a value of type {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("`{key}` is required")]
    #[diagnostic(
        code(causerie::config::missing_key),
        help("set `{key}` in causerie.toml")
    )]
    MissingKey { key: String },

    /// Value parsed but is out of range or otherwise unusable.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(causerie::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(causerie::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, known: &str) -> String {
    let mut help = String::new();
    if let Some(suggestion) = suggestion {
        help.push_str(&format!("perhaps `{suggestion}`? "));
    }
    help.push_str(&format!("accepted keys: {known}"));
    help
}

/// Splits a Figment error chain into one diagnostic per failure.
pub fn from_figment(err: figment::Error, sources: &[ConfigSource]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|failure| diagnose(&failure, sources))
        .collect()
}

fn diagnose(failure: &figment::Error, sources: &[ConfigSource]) -> ConfigError {
    let dotted_path = || failure.path.join(".");

    match &failure.kind {
        Kind::UnknownField(key, known) => {
            let (span, src) = match origin(failure, sources) {
                Some(source) => locate(source, &failure.path, key),
                None => (None, None),
            };
            ConfigError::UnknownKey {
                key: key.clone(),
                suggestion: closest_key(key, known),
                known: known.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(key) => ConfigError::MissingKey {
            key: key.to_string(),
        },
        Kind::InvalidType(found, expected) => ConfigError::InvalidType {
            key: dotted_path(),
            detail: format!("got {found} where {expected} was expected"),
            expected: expected.clone(),
        },
        _ => ConfigError::Other(failure.to_string()),
    }
}

/// The source whose file path Figment attached to `failure`.
fn origin<'a>(failure: &figment::Error, sources: &'a [ConfigSource]) -> Option<&'a ConfigSource> {
    let figment::Source::File(path) = failure.metadata.as_ref()?.source.as_ref()? else {
        return None;
    };
    let name = path.display().to_string();
    sources.iter().find(|source| source.name == name)
}

fn locate(
    source: &ConfigSource,
    section: &[String],
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    match key_offset(&source.content, section, key) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), key.len())),
            Some(NamedSource::new(&source.name, source.content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `key` in `content`, searched after the `[section]` header
/// when `section` is non-empty.
pub fn key_offset(content: &str, section: &[String], key: &str) -> Option<usize> {
    let start = match section.first() {
        Some(table) => {
            let header = format!("[{table}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        let is_assignment = rest
            .strip_prefix(key)
            .and_then(|after| after.chars().next())
            .is_some_and(|c| c == '=' || c == ' ' || c == '\t');
        if is_assignment {
            return Some(line_start + indent);
        }
        line_start += line.len();
    }
    None
}

/// Known key most similar to `unknown`, if any is similar enough.
pub fn closest_key(unknown: &str, known: &[&str]) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for &candidate in known {
        let score = strsim::jaro_winkler(unknown, candidate);
        if score > MIN_SIMILARITY && best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(key, _)| key.to_string())
}

/// Prints each error to stderr as a graphical miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
