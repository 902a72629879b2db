//! Diff-sync channel bound to one client's session.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::diffsync::Message;
use crate::domain::foundation::{ClientId, DomainError};
use crate::ports::{Channel, WebSocketSession};

use super::bridge::MessageTypeBridge;
use super::messages::ServerMessage;

/// Field added to every diff-sync response.
pub const CLIENT_ID_FIELD: &str = "clientId";

/// [`Channel`] writing diff-sync frames to a [`WebSocketSession`].
///
/// One per connection; every frame is stamped with the bound client id.
pub struct SessionChannel {
    session: Arc<dyn WebSocketSession>,
    client_id: ClientId,
    bridge: MessageTypeBridge,
}

impl SessionChannel {
    pub fn new(session: Arc<dyn WebSocketSession>, client_id: ClientId) -> Self {
        Self {
            session,
            client_id,
            bridge: MessageTypeBridge::new(),
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }
}

#[async_trait]
impl Channel for SessionChannel {
    async fn send(&self, message: Message) -> Result<(), DomainError> {
        let body = message.body();
        let wire_type = self.bridge.map(body.exchange_type())?;

        let mut response = body.fields()?;
        response.insert(
            CLIENT_ID_FIELD.to_string(),
            Value::String(self.client_id.to_string()),
        );

        let field_names: Vec<String> = response.keys().cloned().collect();
        let text = ServerMessage::diff_sync(wire_type, response).to_json()?;

        self.session.send_async(text).map_err(|e| {
            tracing::warn!(
                client_id = %self.client_id,
                wire_type,
                fields = ?field_names,
                error = %e,
                "Failed to write diff-sync message"
            );
            DomainError::channel(format!("diff-sync write failed: {e}"))
                .with_detail("client_id", self.client_id.to_string())
                .with_detail("type", wire_type)
        })
    }

    async fn receive(&self, message: Message) -> Result<(), DomainError> {
        // Inbound diff-sync frames are dispatched by the message handler, not here
        let wire_type = self.bridge.map(message.body().exchange_type())?;
        tracing::trace!(client_id = %self.client_id, wire_type, "Channel receive ignored");
        Ok(())
    }
}
