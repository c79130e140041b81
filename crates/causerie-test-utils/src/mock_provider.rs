// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use causerie_core::CauserieError;
use causerie_core::traits::adapter::PluginAdapter;
use causerie_core::traits::provider::ProviderAdapter;
use causerie_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};

/// One scripted outcome of a `complete` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Respond successfully with this text.
    Text(String),
    /// Fail with a provider error carrying this message.
    Fail(String),
}

/// A mock provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty a default
/// "mock response" text is returned. A gated provider blocks every call until
/// [`MockProvider::release`] hands out a permit, which lets tests observe the
/// in-flight state.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
    always_fail: Option<String>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            gate: None,
            always_fail: None,
        }
    }

    /// Create a mock provider pre-loaded with successful text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                responses.into_iter().map(MockReply::Text).collect(),
            )),
            ..Self::new()
        }
    }

    /// A provider whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            always_fail: Some(message.into()),
            ..Self::new()
        }
    }

    /// Make every call wait for a permit from [`MockProvider::release`].
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Lets `n` blocked (or future) calls proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn push_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Add a successful text reply to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.push_reply(MockReply::Text(text.into())).await;
    }

    /// Number of `complete` calls started so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
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
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, CauserieError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| CauserieError::Internal(format!("mock gate closed: {e}")))?;
            permit.forget();
        }

        if let Some(message) = &self.always_fail {
            return Err(CauserieError::provider(message.clone()));
        }

        match self.next_reply().await {
            MockReply::Text(content) => Ok(ProviderResponse {
                content,
                model: request.model,
                finish_reason: Some("STOP".to_string()),
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
            }),
            MockReply::Fail(message) => Err(CauserieError::provider(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causerie_core::types::GenerationConfig;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            system_prompt: None,
            messages: vec![],
            generation: GenerationConfig::default(),
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content, "mock response");
        assert_eq!(resp.model, "test-model");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let provider = MockProvider::with_responses(vec!["first".into(), "second".into()]);
        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(request()).await.unwrap().content, "second");
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn failing_provider_returns_errors() {
        let provider = MockProvider::failing("boom");
        let err = provider.complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn gated_provider_waits_for_release() {
        let provider = Arc::new(MockProvider::with_responses(vec!["ok".into()]).gated());
        let task = {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.complete(request()).await })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!task.is_finished());
        assert_eq!(provider.call_count(), 1);

        provider.release(1);
        assert_eq!(task.await.unwrap().unwrap().content, "ok");
    }
}
