// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Internal typed event bus.
//!
//! Host-side signals (new chat message, connectivity, visibility, explicit
//! summarize requests) and memory status changes travel as [`BusEvent`]
//! variants over a tokio broadcast channel. Subscribers that fall behind
//! receive `RecvError::Lagged` and keep going.

use causerie_core::{ChatMessage, ConversationId, MemoryStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Events understood by the memory driver and emitted by the memory manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum BusEvent {
    /// A message was appended to a conversation log.
    MessageAppended {
        conversation_id: ConversationId,
        message: ChatMessage,
    },
    /// Evaluate the summarization policy now.
    SummarizeRequested { conversation_id: ConversationId },
    /// Re-summarize the whole conversation regardless of thresholds.
    ForceSummarize { conversation_id: ConversationId },
    /// Network reachability changed.
    ConnectivityChanged { online: bool },
    /// The conversation view was shown or hidden.
    VisibilityChanged { visible: bool },
    /// Memory state machine moved to a new status.
    MemoryStatusChanged {
        conversation_id: ConversationId,
        status: MemoryStatus,
        error: Option<String>,
    },
    /// Stop every driver listening on this bus.
    Shutdown,
}

impl BusEvent {
    /// Conversation this event is scoped to. Global events return `None`.
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        match self {
            BusEvent::MessageAppended {
                conversation_id, ..
            }
            | BusEvent::SummarizeRequested { conversation_id }
            | BusEvent::ForceSummarize { conversation_id }
            | BusEvent::MemoryStatusChanged {
                conversation_id, ..
            } => Some(conversation_id),
            BusEvent::ConnectivityChanged { .. }
            | BusEvent::VisibilityChanged { .. }
            | BusEvent::Shutdown => None,
        }
    }
}

/// An event stamped with an id and publication time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: String,
    pub published_at: DateTime<Utc>,
    pub event: BusEvent,
}

/// Broadcast bus shared by the host and every memory instance.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Envelope>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event. Returns the number of subscribers that will see it;
    /// publishing with no subscriber is not an error.
    pub fn publish(&self, event: BusEvent) -> usize {
        let envelope = Envelope {
            id: uuid::Uuid::new_v4().to_string(),
            published_at: Utc::now(),
            event,
        };
        trace!(event_id = %envelope.id, "bus event published");
        self.sender.send(envelope).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_subscribe() {
        let bus = EventBus::default();
        let mut receiver = bus.subscribe();

        let delivered = bus.publish(BusEvent::ConnectivityChanged { online: false });
        assert_eq!(delivered, 1);

        let envelope = receiver.recv().await.unwrap();
        assert_eq!(envelope.event, BusEvent::ConnectivityChanged { online: false });
        assert!(!envelope.id.is_empty());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(BusEvent::Shutdown), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let bus = EventBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        let conversation_id = ConversationId("c1".into());

        bus.publish(BusEvent::SummarizeRequested {
            conversation_id: conversation_id.clone(),
        });

        for receiver in [&mut a, &mut b] {
            let envelope = receiver.recv().await.unwrap();
            assert_eq!(envelope.event.conversation_id(), Some(&conversation_id));
        }
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let bus = EventBus::new(2);
        let mut receiver = bus.subscribe();
        for visible in [true, false, true, false] {
            bus.publish(BusEvent::VisibilityChanged { visible });
        }
        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(2))
        ));
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let event = BusEvent::MemoryStatusChanged {
            conversation_id: ConversationId("c1".into()),
            status: MemoryStatus::Ready,
            error: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "memory_status_changed");
        assert_eq!(json["data"]["status"], "ready");
    }

    #[test]
    fn global_events_have_no_conversation() {
        assert!(BusEvent::Shutdown.conversation_id().is_none());
        assert!(BusEvent::VisibilityChanged { visible: true }
            .conversation_id()
            .is_none());
    }
}
