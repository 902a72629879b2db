//! The unit transported on the bus.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{ClientId, DomainError};

use super::payload::BroadcastPayload;
use super::{topic, EventDescriptor};

/// A typed notification payload that knows which topic it routes to.
///
/// `topic()` must depend only on the ids inside the payload.
pub trait RoutedPayload: Serialize {
    fn topic(&self) -> String;
}

/// One fanout-ready notification: event + payload + origin + routing metadata.
///
/// Created by a producer at publish time, transported once, then dropped.
/// All fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consumable {
    originating_client: ClientId,
    descriptor: EventDescriptor,
    payload: BroadcastPayload,
    topic: String,
    broadcast_type: String,
    subscription_instance_id: Uuid,
}

impl Consumable {
    /// Builds a consumable from a routed payload.
    ///
    /// The topic is taken from the payload and a fresh correlation id is
    /// generated for every call.
    pub fn from_payload<P: RoutedPayload>(
        originating_client: ClientId,
        descriptor: EventDescriptor,
        broadcast_type: impl Into<String>,
        payload: &P,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            originating_client,
            descriptor,
            topic: payload.topic(),
            payload: BroadcastPayload::from_serializable(payload)?,
            broadcast_type: broadcast_type.into(),
            subscription_instance_id: Uuid::new_v4(),
        })
    }

    pub fn originating_client(&self) -> &ClientId {
        &self.originating_client
    }

    pub fn descriptor(&self) -> &EventDescriptor {
        &self.descriptor
    }

    pub fn payload(&self) -> &BroadcastPayload {
        &self.payload
    }

    /// Routing key on the bus.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wire `type` shared by every notification on this topic family.
    pub fn broadcast_type(&self) -> &str {
        &self.broadcast_type
    }

    /// Correlation id, rendered as the wire `replyTo`.
    pub fn subscription_instance_id(&self) -> Uuid {
        self.subscription_instance_id
    }

    /// `{topic}/{effectiveName}`, for logs and audit only.
    pub fn instance_name(&self) -> String {
        topic::instance_name(&self.topic, &self.descriptor)
    }
}
