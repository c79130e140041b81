// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as sampling ranges, non-zero windows and compilable fact patterns.

use crate::diagnostic::ConfigError;
use crate::model::CauserieConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CauserieConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.to_lowercase().as_str()) {
        fail(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.gemini.model.trim().is_empty() {
        fail("gemini.model must not be empty".to_string());
    }

    if !(config.gemini.api_base.starts_with("http://")
        || config.gemini.api_base.starts_with("https://"))
    {
        fail(format!(
            "gemini.api_base `{}` must be an http(s) URL",
            config.gemini.api_base
        ));
    }

    let memory = &config.memory;

    if memory.short_window_size == 0 {
        fail("memory.short_window_size must be at least 1".to_string());
    }

    if memory.fallback_turns == 0 {
        fail("memory.fallback_turns must be at least 1".to_string());
    }

    if !(0.0..=2.0).contains(&memory.temperature) {
        fail(format!(
            "memory.temperature must be within 0.0..=2.0, got {}",
            memory.temperature
        ));
    }

    if !(memory.top_p > 0.0 && memory.top_p <= 1.0) {
        fail(format!(
            "memory.top_p must be within (0.0, 1.0], got {}",
            memory.top_p
        ));
    }

    if memory.top_k == 0 {
        fail("memory.top_k must be at least 1".to_string());
    }

    if memory.max_output_tokens == 0 {
        fail("memory.max_output_tokens must be at least 1".to_string());
    }

    if memory.request_timeout_secs == 0 {
        fail("memory.request_timeout_secs must be at least 1".to_string());
    }

    for (i, pattern) in memory.extra_fact_patterns.iter().enumerate() {
        if let Err(e) = regex::Regex::new(pattern) {
            fail(format!(
                "memory.extra_fact_patterns[{i}] is not a valid regular expression: {e}"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CauserieConfig::default()).is_ok());
    }

    #[test]
    fn zero_window_fails_validation() {
        let mut config = CauserieConfig::default();
        config.memory.short_window_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "short_window_size"));
    }

    #[test]
    fn sampling_out_of_range_collects_every_error() {
        let mut config = CauserieConfig::default();
        config.memory.temperature = 3.5;
        config.memory.top_p = 0.0;
        config.memory.max_output_tokens = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "temperature"));
        assert!(has_error(&errors, "top_p"));
        assert!(has_error(&errors, "max_output_tokens"));
    }

    #[test]
    fn broken_fact_pattern_fails_validation() {
        let mut config = CauserieConfig::default();
        config.memory.extra_fact_patterns = vec!["(?i)allergi".into(), "(unclosed".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "extra_fact_patterns[1]"));
        assert!(!has_error(&errors, "extra_fact_patterns[0]"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = CauserieConfig::default();
        config.agent.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "log_level"));
    }

    #[test]
    fn non_http_api_base_fails_validation() {
        let mut config = CauserieConfig::default();
        config.gemini.api_base = "ftp://example".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "api_base"));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = CauserieConfig::default();
        config.storage.database_path = "  ".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }
}
