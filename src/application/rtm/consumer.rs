//! Consumer - per-connection bus listener for one event kind.
//!
//! ```text
//! consumable ──▶ descriptor matches? ──no──▶ ignore
//!                      │yes
//!                      ▼
//!           origin == this client? ──yes──▶ drop (echo suppression)
//!                      │no
//!                      ▼
//!              session open? ──no──▶ drop
//!                      │yes
//!                      ▼
//!            render ─▶ session.send_async
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{ClientId, DomainError};
use crate::domain::rtm::{BroadcastMessage, Consumable, EventDescriptor};
use crate::ports::{BusListener, WebSocketSession};

/// Outcome of offering a consumable to a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Rendered and queued on the session.
    Delivered,
    /// The receiving client caused the mutation.
    EchoSuppressed,
    /// Another event kind on the same topic.
    Ignored,
    /// The session has already closed.
    SessionClosed,
}

/// Bus listener bound to one connected client and one event descriptor.
pub struct Consumer {
    client_id: ClientId,
    descriptor: EventDescriptor,
    session: Arc<dyn WebSocketSession>,
}

impl Consumer {
    pub fn new(
        client_id: ClientId,
        descriptor: EventDescriptor,
        session: Arc<dyn WebSocketSession>,
    ) -> Self {
        Self {
            client_id,
            descriptor,
            session,
        }
    }

    pub fn descriptor(&self) -> &EventDescriptor {
        &self.descriptor
    }

    /// Applies echo suppression, renders, and writes to the session.
    ///
    /// # Errors
    ///
    /// `ChannelOperationFailed` if the session rejected the frame, or
    /// `SerializationFailed` if rendering failed. Suppressed and ignored
    /// consumables are not errors.
    pub fn accept(&self, consumable: &Consumable) -> Result<Delivery, DomainError> {
        if !self.descriptor.matches(consumable.descriptor()) {
            return Ok(Delivery::Ignored);
        }

        if consumable.originating_client() == &self.client_id {
            tracing::trace!(
                client_id = %self.client_id,
                instance = %consumable.instance_name(),
                "Suppressing echo to originating client"
            );
            return Ok(Delivery::EchoSuppressed);
        }

        if !self.session.is_open() {
            return Ok(Delivery::SessionClosed);
        }

        let text = BroadcastMessage::render(consumable).to_json()?;

        self.session.send_async(text).map_err(|e| {
            tracing::warn!(
                client_id = %self.client_id,
                instance = %consumable.instance_name(),
                reply_to = %consumable.subscription_instance_id(),
                error = %e,
                "Failed to write broadcast to session"
            );
            DomainError::channel(format!("broadcast write failed: {e}"))
                .with_detail("client_id", self.client_id.to_string())
                .with_detail("topic", consumable.topic())
        })?;

        Ok(Delivery::Delivered)
    }
}

#[async_trait]
impl BusListener for Consumer {
    async fn on_message(&self, consumable: &Consumable) -> Result<(), DomainError> {
        self.accept(consumable).map(|_| ())
    }

    fn name(&self) -> &'static str {
        "RtmConsumer"
    }
}
