//! Competency document notifications.

use serde::Serialize;

use crate::domain::foundation::{ClientId, DocumentId, DocumentItemId, DomainError};
use crate::domain::rtm::{
    topic, Consumable, EventDescriptor, Producer, RoutedPayload, RtmSubscription,
};

pub const BROADCAST_TYPE: &str = "competency.document.broadcast";

pub const DOCUMENT_UPDATED: EventDescriptor =
    EventDescriptor::new("COMPETENCY_DOCUMENT_UPDATED", "DOCUMENT_UPDATED");
pub const ITEM_CREATED: EventDescriptor =
    EventDescriptor::new("COMPETENCY_DOCUMENT_ITEM_CREATED", "DOCUMENT_ITEM_CREATED");
pub const ITEM_UPDATED: EventDescriptor =
    EventDescriptor::new("COMPETENCY_DOCUMENT_ITEM_UPDATED", "DOCUMENT_ITEM_UPDATED");
pub const ITEM_DELETED: EventDescriptor =
    EventDescriptor::new("COMPETENCY_DOCUMENT_ITEM_DELETED", "DOCUMENT_ITEM_DELETED");

pub fn events() -> Vec<EventDescriptor> {
    vec![DOCUMENT_UPDATED, ITEM_CREATED, ITEM_UPDATED, ITEM_DELETED]
}

/// Payload of a competency document notification. Document-level events
/// carry no item id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBroadcast {
    pub document_id: DocumentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_item_id: Option<DocumentItemId>,
}

impl RoutedPayload for DocumentBroadcast {
    fn topic(&self) -> String {
        topic::competency_document(&self.document_id)
    }
}

#[derive(Debug, Clone)]
pub struct DocumentChange {
    pub event: EventDescriptor,
    pub document_id: DocumentId,
    pub document_item_id: Option<DocumentItemId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentProducer;

impl Producer for DocumentProducer {
    type Params = DocumentChange;

    fn build(&self, origin: &ClientId, change: DocumentChange) -> Result<Consumable, DomainError> {
        let payload = DocumentBroadcast {
            document_id: change.document_id,
            document_item_id: change.document_item_id,
        };
        Consumable::from_payload(origin.clone(), change.event, BROADCAST_TYPE, &payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSubscription {
    pub document_id: DocumentId,
}

impl RtmSubscription for DocumentSubscription {
    fn name(&self) -> &'static str {
        topic::COMPETENCY_DOCUMENT
    }

    fn topic(&self) -> String {
        topic::competency_document(&self.document_id)
    }

    fn events(&self) -> Vec<EventDescriptor> {
        events()
    }
}
