// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini provider adapter for Causerie.
//!
//! Implements [`ProviderAdapter`] over the `generateContent` endpoint of the
//! Generative Language API. Only single-shot completion is supported.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use causerie_config::CauserieConfig;
use causerie_core::error::CauserieError;
use causerie_core::traits::{PluginAdapter, ProviderAdapter};
use causerie_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{ApiGenerationConfig, Content, GenerateContentRequest, Part};

/// Environment variable consulted when `gemini.api_key` is unset.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiProvider {
    client: GeminiClient,
    default_model: String,
}

impl GeminiProvider {
    /// Creates a provider from the `[gemini]` configuration section.
    pub fn new(config: &CauserieConfig) -> Result<Self, CauserieError> {
        let api_key = resolve_api_key(&config.gemini.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            &config.gemini.api_base,
            config.gemini.max_retries,
            Duration::from_secs(config.gemini.timeout_secs),
        )?;

        info!(model = %config.gemini.model, "Gemini provider initialized");

        Ok(Self {
            client,
            default_model: config.gemini.model.clone(),
        })
    }

    /// Model used when a request leaves `model` empty.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn to_api_request(request: &ProviderRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| Content {
                role: Some(api_role(&m.role).to_string()),
                parts: vec![Part::text(m.content.clone())],
            })
            .collect();

        GenerateContentRequest {
            system_instruction: request.system_prompt.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part::text(text.clone())],
            }),
            contents,
            generation_config: ApiGenerationConfig {
                temperature: request.generation.temperature,
                top_k: request.generation.top_k,
                top_p: request.generation.top_p,
                max_output_tokens: request.generation.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, CauserieError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, CauserieError> {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };
        let api_request = Self::to_api_request(&request);

        let response = self.client.generate_content(&model, &api_request).await?;
        let content = response
            .first_text()
            .ok_or_else(|| CauserieError::provider("response contained no candidates"))?;

        let usage = response.usage_metadata.clone().unwrap_or_default();
        debug!(
            model = %model,
            input_tokens = usage.prompt_token_count,
            output_tokens = usage.candidates_token_count,
            "completion received"
        );

        Ok(ProviderResponse {
            content,
            model: response.model_version.clone().unwrap_or(model),
            finish_reason: response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone()),
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}

/// The API calls the assistant side "model".
fn api_role(role: &str) -> &str {
    match role {
        "assistant" | "model" => "model",
        _ => "user",
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, CauserieError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var(API_KEY_ENV).map_err(|_| {
        CauserieError::Config(
            "Gemini API key not found. Set gemini.api_key in config or GEMINI_API_KEY environment variable.".into(),
        )
    })
}
