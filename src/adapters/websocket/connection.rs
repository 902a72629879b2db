//! Per-connection state: identity, outbound session, subscriptions, channel.
//!
//! A [`ConnectionContext`] is created on upgrade and closed on disconnect.
//! It owns the connection's [`SubscriptionRegistry`]; nothing outside the
//! connection can reach it.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::application::SubscriptionRegistry;
use crate::domain::foundation::{ClientId, DomainError, ErrorCode};
use crate::domain::rtm::families::{ActivitySubscription, DocumentSubscription, ProgressSubscription};
use crate::ports::{Bus, WebSocketSession};

use super::channel::SessionChannel;
use super::messages::{ClientMessage, ServerMessage};
use super::session::OutboundSession;

pub struct ConnectionContext {
    client_id: ClientId,
    session: Arc<OutboundSession>,
    registry: SubscriptionRegistry,
    channel: Arc<SessionChannel>,
}

impl ConnectionContext {
    /// Opens a connection with a fresh client id.
    ///
    /// Returns the receiver of outbound frames for the socket writer.
    pub fn open(bus: Arc<dyn Bus>) -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::open_as(ClientId::new(), bus)
    }

    pub fn open_as(
        client_id: ClientId,
        bus: Arc<dyn Bus>,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (session, outbound) = OutboundSession::new();
        let session = Arc::new(session);

        let registry = SubscriptionRegistry::new(client_id.clone(), session.clone(), bus);
        let channel = Arc::new(SessionChannel::new(session.clone(), client_id.clone()));

        let context = Self {
            client_id,
            session,
            registry,
            channel,
        };
        (context, outbound)
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Diff-sync channel for this client.
    pub fn channel(&self) -> Arc<SessionChannel> {
        Arc::clone(&self.channel)
    }

    /// Queues a server frame on this connection.
    pub fn send(&self, message: &ServerMessage) -> Result<(), DomainError> {
        let text = message.to_json()?;
        self.session
            .send_async(text)
            .map_err(|e| DomainError::channel(e.to_string()))
    }

    /// Handles one inbound text frame and queues the reply.
    pub async fn respond(&self, text: &str) -> Result<(), DomainError> {
        let reply = self.handle_text(text).await;
        self.send(&reply)
    }

    /// Parses and dispatches one inbound text frame, returning the reply.
    pub async fn handle_text(&self, text: &str) -> ServerMessage {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                let err = DomainError::invalid_argument("message", format!("malformed JSON: {e}"));
                return ServerMessage::error(None, &err);
            }
        };

        let reply_to = value.get("id").and_then(Value::as_str).map(str::to_string);
        let message_type = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if !ClientMessage::TYPES.contains(&message_type.as_str()) {
            let err = DomainError::new(
                ErrorCode::UnsupportedOperation,
                format!("unsupported message type '{message_type}'"),
            );
            return ServerMessage::error(reply_to, &err);
        }

        match serde_json::from_value::<ClientMessage>(value) {
            Ok(message) => self.handle(message).await,
            Err(e) => {
                let err = DomainError::invalid_argument(message_type.as_str(), e.to_string());
                ServerMessage::error(reply_to, &err)
            }
        }
    }

    /// Dispatches a parsed client message.
    pub async fn handle(&self, message: ClientMessage) -> ServerMessage {
        let message_type = message.message_type();
        let reply_to = message.id().map(str::to_string);

        let result = match message {
            ClientMessage::Ping { .. } => return ServerMessage::pong(reply_to),

            ClientMessage::AuthorActivitySubscribe(r) => self
                .registry
                .subscribe_family(&ActivitySubscription {
                    activity_id: r.activity_id,
                })
                .await
                .map(|_| ()),
            ClientMessage::AuthorActivityUnsubscribe(r) => {
                self.registry
                    .unsubscribe_family(&ActivitySubscription {
                        activity_id: r.activity_id,
                    })
                    .await;
                Ok(())
            }

            ClientMessage::LearnerProgressSubscribe(r) => self
                .registry
                .subscribe_family(&ProgressSubscription {
                    student_id: r.student_id,
                    deployment_id: r.deployment_id,
                    courseware_element_id: r.courseware_element_id,
                })
                .await
                .map(|_| ()),
            ClientMessage::LearnerProgressUnsubscribe(r) => {
                self.registry
                    .unsubscribe_family(&ProgressSubscription {
                        student_id: r.student_id,
                        deployment_id: r.deployment_id,
                        courseware_element_id: r.courseware_element_id,
                    })
                    .await;
                Ok(())
            }

            ClientMessage::CompetencyDocumentSubscribe(r) => self
                .registry
                .subscribe_family(&DocumentSubscription {
                    document_id: r.document_id,
                })
                .await
                .map(|_| ()),
            ClientMessage::CompetencyDocumentUnsubscribe(r) => {
                self.registry
                    .unsubscribe_family(&DocumentSubscription {
                        document_id: r.document_id,
                    })
                    .await;
                Ok(())
            }
        };

        match result {
            Ok(()) => ServerMessage::ok(message_type, reply_to),
            Err(e) => {
                tracing::debug!(
                    client_id = %self.client_id,
                    message_type,
                    error = %e,
                    "Client request failed"
                );
                ServerMessage::error(reply_to, &e)
            }
        }
    }

    /// Closes the session and tears down every subscription.
    pub async fn close(&self) -> usize {
        self.session.close();
        self.registry.teardown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::bus::InMemoryBus;
    use crate::domain::foundation::{ActivityId, DocumentId};
    use crate::domain::rtm::topic;
    use serde_json::json;

    fn open() -> (ConnectionContext, mpsc::UnboundedReceiver<String>, Arc<InMemoryBus>) {
        let bus = Arc::new(InMemoryBus::new());
        let (context, rx) = ConnectionContext::open(bus.clone());
        (context, rx, bus)
    }

    #[tokio::test]
    async fn activity_subscribe_registers_family_and_replies_ok() {
        let (context, _rx, bus) = open();
        let activity_id = ActivityId::new();

        let reply = context
            .handle_text(
                &json!({
                    "type": "author.activity.subscribe",
                    "id": "r1",
                    "activityId": activity_id.to_string(),
                })
                .to_string(),
            )
            .await;

        assert_eq!(reply, ServerMessage::ok("author.activity.subscribe", Some("r1".to_string())));
        assert_eq!(bus.listener_count(&topic::author_activity(&activity_id)), 6);
    }

    #[tokio::test]
    async fn document_unsubscribe_releases_listeners() {
        let (context, _rx, bus) = open();
        let document_id = DocumentId::new();
        let subscribe = json!({
            "type": "competency.document.subscribe",
            "documentId": document_id.to_string(),
        });
        let unsubscribe = json!({
            "type": "competency.document.unsubscribe",
            "documentId": document_id.to_string(),
        });

        context.handle_text(&subscribe.to_string()).await;
        let reply = context.handle_text(&unsubscribe.to_string()).await;

        assert_eq!(reply.message_type, "competency.document.unsubscribe.ok");
        assert_eq!(bus.listener_count(&topic::competency_document(&document_id)), 0);
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let (context, _rx, _bus) = open();
        let reply = context.handle_text(r#"{"type":"ping","id":"p1"}"#).await;
        assert_eq!(reply, ServerMessage::pong(Some("p1".to_string())));
    }

    #[tokio::test]
    async fn unknown_type_is_unsupported() {
        let (context, _rx, _bus) = open();

        let reply = context.handle_text(r#"{"type":"teleport","id":"x"}"#).await;

        assert_eq!(reply.message_type, "error");
        assert_eq!(reply.reply_to.as_deref(), Some("x"));
        assert_eq!(reply.response["code"], "UNSUPPORTED_OPERATION");
    }

    #[tokio::test]
    async fn malformed_payload_is_invalid_argument() {
        let (context, _rx, _bus) = open();

        let reply = context
            .handle_text(r#"{"type":"author.activity.subscribe","id":"r","activityId":"nope"}"#)
            .await;

        assert_eq!(reply.response["code"], "INVALID_ARGUMENT");
        assert_eq!(reply.reply_to.as_deref(), Some("r"));
    }

    #[tokio::test]
    async fn non_json_frame_is_invalid_argument() {
        let (context, _rx, _bus) = open();
        let reply = context.handle_text("hello").await;
        assert_eq!(reply.response["code"], "INVALID_ARGUMENT");
        assert_eq!(reply.reply_to, None);
    }

    #[tokio::test]
    async fn respond_queues_reply_on_session() {
        let (context, mut rx, _bus) = open();

        context.respond(r#"{"type":"ping"}"#).await.unwrap();

        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame, json!({ "type": "pong" }));
    }

    #[tokio::test]
    async fn close_tears_down_and_rejects_later_subscribes() {
        let (context, _rx, bus) = open();
        let activity_id = ActivityId::new();
        let request = json!({
            "type": "author.activity.subscribe",
            "id": "r",
            "activityId": activity_id.to_string(),
        })
        .to_string();
        context.handle_text(&request).await;

        assert_eq!(context.close().await, 6);

        let reply = context.handle_text(&request).await;
        assert_eq!(reply.response["code"], "REGISTRY_CLOSED");
        assert_eq!(bus.listener_count(&topic::author_activity(&activity_id)), 0);
    }

    #[tokio::test]
    async fn channel_is_bound_to_connection_client() {
        let (context, _rx, _bus) = open();
        assert_eq!(context.channel().client_id(), context.client_id());
    }
}
