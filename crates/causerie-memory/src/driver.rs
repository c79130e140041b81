// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bus-driven wiring for one [`HybridMemory`].
//!
//! The driver listens on the [`EventBus`] and turns host signals into memory
//! operations. When a driver is attached it owns appends: publish
//! `MessageAppended` instead of calling `push` directly.

use causerie_bus::{BusEvent, Envelope, EventBus};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::manager::HybridMemory;

pub struct MemoryDriver {
    memory: HybridMemory,
    events: broadcast::Receiver<Envelope>,
}

impl MemoryDriver {
    /// Subscribes immediately, so events published after this call are seen
    /// even if the driver has not started running yet.
    pub fn new(memory: HybridMemory, bus: &EventBus) -> Self {
        Self {
            memory,
            events: bus.subscribe(),
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Processes events until `Shutdown` or until the bus is dropped.
    pub async fn run(mut self) {
        let conversation_id = self.memory.conversation_id().clone();
        info!(%conversation_id, "memory driver started");

        loop {
            match self.events.recv().await {
                Ok(envelope) => {
                    if !self.handle(envelope.event) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%conversation_id, skipped, "memory driver lagged behind the bus");
                    // Appends may have been lost; at least re-check the policy.
                    self.memory.request_summarization_if_needed();
                }
                Err(RecvError::Closed) => break,
            }
        }

        info!(%conversation_id, "memory driver stopped");
    }

    /// Applies one event. Returns false when the driver should stop.
    pub fn handle(&self, event: BusEvent) -> bool {
        if let Some(id) = event.conversation_id()
            && id != self.memory.conversation_id()
        {
            return true;
        }

        match event {
            BusEvent::MessageAppended { message, .. } => {
                self.memory.push(message);
            }
            BusEvent::SummarizeRequested { .. } => {
                self.memory.request_summarization_if_needed();
            }
            BusEvent::ForceSummarize { .. } => {
                if self.memory.force_summarize_now().is_none() {
                    debug!(
                        conversation_id = %self.memory.conversation_id(),
                        "forced summarization not started"
                    );
                }
            }
            BusEvent::ConnectivityChanged { online } => {
                let was_offline = self.memory.set_offline(!online);
                if online && was_offline {
                    self.memory.request_summarization_if_needed();
                }
            }
            BusEvent::VisibilityChanged { visible } => {
                if visible {
                    self.memory.request_summarization_if_needed();
                }
            }
            BusEvent::MemoryStatusChanged { .. } => {}
            BusEvent::Shutdown => return false,
        }
        true
    }
}
