//! WebSocket message types for the real-time messaging protocol.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: connection greeting, request replies, errors, pongs,
//!   diff-sync frames (broadcasts use [`BroadcastMessage`](crate::domain::rtm::BroadcastMessage))
//! - Client → Server: topic subscribe/unsubscribe requests, pings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{
    ActivityId, ClientId, CoursewareElementId, DeploymentId, DocumentId, DomainError, StudentId,
};

// ============================================
// Server → Client Messages
// ============================================

pub const CONNECTED: &str = "connected";
pub const ERROR: &str = "error";
pub const PONG: &str = "pong";

/// Envelope for every server-originated frame that is not a broadcast.
///
/// Same shape as broadcasts: `{type, replyTo?, response?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(rename = "replyTo", default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub response: Map<String, Value>,
}

impl ServerMessage {
    fn new(message_type: impl Into<String>, reply_to: Option<String>) -> Self {
        Self {
            message_type: message_type.into(),
            reply_to,
            response: Map::new(),
        }
    }

    fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.response.insert(key.to_string(), value.into());
        self
    }

    /// Greeting sent once after the upgrade.
    pub fn connected(client_id: &ClientId, timestamp: impl Into<String>) -> Self {
        Self::new(CONNECTED, None)
            .with_field("clientId", client_id.as_str())
            .with_field("timestamp", timestamp.into())
    }

    /// Success reply to a client request of `request_type`.
    pub fn ok(request_type: &str, reply_to: Option<String>) -> Self {
        Self::new(format!("{request_type}.ok"), reply_to)
    }

    pub fn error(reply_to: Option<String>, error: &DomainError) -> Self {
        Self::new(ERROR, reply_to)
            .with_field("code", error.code.to_string())
            .with_field("message", error.message.clone())
    }

    pub fn pong(reply_to: Option<String>) -> Self {
        Self::new(PONG, reply_to)
    }

    /// Diff-sync frame: `{type: "diffSync.*", response: {..fields, clientId}}`.
    pub fn diff_sync(wire_type: &str, response: Map<String, Value>) -> Self {
        Self {
            message_type: wire_type.to_string(),
            reply_to: None,
            response,
        }
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================
// Client → Server Messages
// ============================================

pub const AUTHOR_ACTIVITY_SUBSCRIBE: &str = "author.activity.subscribe";
pub const AUTHOR_ACTIVITY_UNSUBSCRIBE: &str = "author.activity.unsubscribe";
pub const LEARNER_PROGRESS_SUBSCRIBE: &str = "learner.progress.subscribe";
pub const LEARNER_PROGRESS_UNSUBSCRIBE: &str = "learner.progress.unsubscribe";
pub const COMPETENCY_DOCUMENT_SUBSCRIBE: &str = "competency.document.subscribe";
pub const COMPETENCY_DOCUMENT_UNSUBSCRIBE: &str = "competency.document.unsubscribe";
pub const PING: &str = "ping";

/// All message types that can be received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "author.activity.subscribe")]
    AuthorActivitySubscribe(ActivityRequest),

    #[serde(rename = "author.activity.unsubscribe")]
    AuthorActivityUnsubscribe(ActivityRequest),

    #[serde(rename = "learner.progress.subscribe")]
    LearnerProgressSubscribe(ProgressRequest),

    #[serde(rename = "learner.progress.unsubscribe")]
    LearnerProgressUnsubscribe(ProgressRequest),

    #[serde(rename = "competency.document.subscribe")]
    CompetencyDocumentSubscribe(DocumentRequest),

    #[serde(rename = "competency.document.unsubscribe")]
    CompetencyDocumentUnsubscribe(DocumentRequest),

    /// Heartbeat request.
    #[serde(rename = "ping")]
    Ping {
        #[serde(default)]
        id: Option<String>,
    },
}

impl ClientMessage {
    /// Every inbound `type` this server understands.
    pub const TYPES: [&'static str; 7] = [
        AUTHOR_ACTIVITY_SUBSCRIBE,
        AUTHOR_ACTIVITY_UNSUBSCRIBE,
        LEARNER_PROGRESS_SUBSCRIBE,
        LEARNER_PROGRESS_UNSUBSCRIBE,
        COMPETENCY_DOCUMENT_SUBSCRIBE,
        COMPETENCY_DOCUMENT_UNSUBSCRIBE,
        PING,
    ];

    pub fn message_type(&self) -> &'static str {
        match self {
            ClientMessage::AuthorActivitySubscribe(_) => AUTHOR_ACTIVITY_SUBSCRIBE,
            ClientMessage::AuthorActivityUnsubscribe(_) => AUTHOR_ACTIVITY_UNSUBSCRIBE,
            ClientMessage::LearnerProgressSubscribe(_) => LEARNER_PROGRESS_SUBSCRIBE,
            ClientMessage::LearnerProgressUnsubscribe(_) => LEARNER_PROGRESS_UNSUBSCRIBE,
            ClientMessage::CompetencyDocumentSubscribe(_) => COMPETENCY_DOCUMENT_SUBSCRIBE,
            ClientMessage::CompetencyDocumentUnsubscribe(_) => COMPETENCY_DOCUMENT_UNSUBSCRIBE,
            ClientMessage::Ping { .. } => PING,
        }
    }

    /// Client-chosen correlation id, echoed as `replyTo`.
    pub fn id(&self) -> Option<&str> {
        match self {
            ClientMessage::AuthorActivitySubscribe(r)
            | ClientMessage::AuthorActivityUnsubscribe(r) => r.id.as_deref(),
            ClientMessage::LearnerProgressSubscribe(r)
            | ClientMessage::LearnerProgressUnsubscribe(r) => r.id.as_deref(),
            ClientMessage::CompetencyDocumentSubscribe(r)
            | ClientMessage::CompetencyDocumentUnsubscribe(r) => r.id.as_deref(),
            ClientMessage::Ping { id } => id.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub activity_id: ActivityId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub student_id: StudentId,
    pub deployment_id: DeploymentId,
    pub courseware_element_id: CoursewareElementId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub document_id: DocumentId,
}
