// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapters and the memory manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// Generates a fresh random conversation id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

/// Lifecycle of a conversation's long-term memory.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemoryStatus {
    /// Nothing summarized yet.
    #[default]
    Idle,
    /// A summarization call is in flight.
    Running,
    /// The last cycle committed a result.
    Ready,
    /// The last cycle failed; previous summary and facts are kept.
    Error,
}

// --- Conversation log ---

/// Body of a chat message.
///
/// Only [`MessageBody::Text`] counts as a conversation turn. Anything else
/// (cards, tool widgets, system notices) is carried verbatim as JSON and
/// skipped by the memory manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Rich(serde_json::Value),
}

/// A single entry in the append-only conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: MessageBody,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ChatMessage {
    /// A plain-text message written by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageBody::Text(text.into()), true)
    }

    /// A plain-text message written by the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageBody::Text(text.into()), false)
    }

    /// A structured (non-text) message.
    pub fn rich(payload: serde_json::Value, is_user: bool) -> Self {
        Self::new(MessageBody::Rich(payload), is_user)
    }

    fn new(text: MessageBody, is_user: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            is_user,
            timestamp: Utc::now(),
            image_url: None,
        }
    }

    /// Returns the plain text of this message, if it has any.
    pub fn as_text(&self) -> Option<&str> {
        match &self.text {
            MessageBody::Text(text) => Some(text),
            MessageBody::Rich(_) => None,
        }
    }
}

// --- Provider types ---

/// Sampling parameters for a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_k: 40,
            top_p: 0.9,
            max_output_tokens: 512,
        }
    }
}

/// A single message sent to a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
}

/// A request to a generative text provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub generation: GenerationConfig,
}

/// Token counts reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A non-streaming provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Concatenated text of the first candidate.
    pub content: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string_body_deserializes_as_text() {
        let json = r#"{"id":"m1","text":"bonjour","isUser":true,"timestamp":"2026-01-01T00:00:00Z"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.as_text(), Some("bonjour"));
        assert!(msg.is_user);
        assert!(msg.image_url.is_none());
    }

    #[test]
    fn structured_body_deserializes_as_rich() {
        let json = r#"{"id":"m2","text":{"type":"weather","city":"Lyon"},"isUser":false,"timestamp":"2026-01-01T00:00:00Z","imageUrl":"https://x/y.png"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert!(msg.as_text().is_none());
        assert_eq!(msg.image_url.as_deref(), Some("https://x/y.png"));
    }

    #[test]
    fn generation_defaults_favor_determinism() {
        let generation = GenerationConfig::default();
        assert_eq!(generation.temperature, 0.3);
        assert_eq!(generation.top_k, 40);
        assert_eq!(generation.top_p, 0.9);
        assert_eq!(generation.max_output_tokens, 512);
    }

    #[test]
    fn memory_status_renders_lowercase() {
        assert_eq!(MemoryStatus::Running.to_string(), "running");
        assert_eq!(MemoryStatus::default(), MemoryStatus::Idle);
        let json = serde_json::to_string(&MemoryStatus::Ready).unwrap();
        assert_eq!(json, "\"ready\"");
    }

    #[test]
    fn constructors_assign_unique_ids() {
        let a = ChatMessage::user("a");
        let b = ChatMessage::assistant("b");
        assert_ne!(a.id, b.id);
        assert!(a.is_user);
        assert!(!b.is_user);
    }
}
