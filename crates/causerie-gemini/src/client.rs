// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Provides [`GeminiClient`] which handles URL construction, API key
//! authentication and transient error retry.

use std::time::Duration;

use causerie_core::CauserieError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    max_retries: u32,
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// `api_base` is the scheme and host of the Generative Language API; the
    /// versioned model path is appended per request.
    pub fn new(
        api_key: &str,
        api_base: &str,
        max_retries: u32,
        timeout: Duration,
    ) -> Result<Self, CauserieError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                CauserieError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CauserieError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            max_retries,
        })
    }

    /// Full endpoint URL for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.api_base)
    }

    /// Sends a request and returns the parsed response.
    ///
    /// On transient errors (429, 500, 503), retries up to `max_retries` times
    /// after a 1-second delay.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CauserieError> {
        let url = self.endpoint(model);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generateContent after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| CauserieError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, model, "generateContent response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| CauserieError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| CauserieError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let message = describe_error(status, &body);

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(CauserieError::provider(message));
                continue;
            }

            return Err(CauserieError::provider(message));
        }

        Err(last_error
            .unwrap_or_else(|| CauserieError::provider("generateContent failed after retries")))
    }
}

fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "Gemini API error ({} {}): {}",
            api_err.error.code, api_err.error.status, api_err.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
