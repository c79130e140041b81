// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Causerie.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use causerie_core::types::GenerationConfig;
use serde::{Deserialize, Serialize};

/// Top-level Causerie configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CauserieConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gemini API settings used for summarization.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Hybrid memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Key-value persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in the shell prompt.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "causerie".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` requires the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for summarization calls.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Retries on transient HTTP statuses (429, 500, 503).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// HTTP client timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            api_base: default_api_base(),
            max_retries: default_max_retries(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_max_retries() -> u32 {
    1
}

fn default_http_timeout_secs() -> u64 {
    60
}

/// Hybrid memory configuration.
///
/// Controls the short-term window, the summarization trigger and the
/// sampling parameters of the summarization call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Number of recent text turns kept verbatim.
    #[serde(default = "default_short_window_size")]
    pub short_window_size: usize,

    /// Automatic summarization only runs once the conversation has more
    /// text turns than this.
    #[serde(default = "default_summarize_threshold")]
    pub summarize_threshold: usize,

    /// Evaluate the trigger policy after every appended message.
    #[serde(default = "default_true")]
    pub auto_summarize: bool,

    /// Use the offline summarizer when the remote call fails or returns nothing.
    /// When false, such failures put the memory in the error state.
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,

    /// Number of trailing turns the offline summarizer reads.
    #[serde(default = "default_fallback_turns")]
    pub fallback_turns: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Upper bound on one summarization call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Drop a summarization result when `set_summary`/`set_facts` ran while
    /// it was in flight. Off by default: the last completed result wins.
    #[serde(default)]
    pub discard_superseded: bool,

    /// Additional regular expressions marking a sentence as a durable fact.
    #[serde(default)]
    pub extra_fact_patterns: Vec<String>,
}

impl MemoryConfig {
    /// Sampling parameters for the summarization call.
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_window_size: default_short_window_size(),
            summarize_threshold: default_summarize_threshold(),
            auto_summarize: true,
            fallback_enabled: true,
            fallback_turns: default_fallback_turns(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            discard_superseded: false,
            extra_fact_patterns: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_short_window_size() -> usize {
    10
}

fn default_summarize_threshold() -> usize {
    16
}

fn default_fallback_turns() -> usize {
    12
}

fn default_temperature() -> f32 {
    0.3
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.9
}

fn default_max_output_tokens() -> u32 {
    512
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Key-value persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file holding pinned facts.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("causerie").join("causerie.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("causerie.db"))
        .to_string_lossy()
        .into_owned()
}
