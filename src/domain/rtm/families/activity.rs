//! Author activity notifications.
//!
//! Any change to an element inside an activity tree is broadcast on the
//! activity's topic. Event names are scoped by the changed element's type,
//! so a theme change on an interactive reaches clients as
//! `INTERACTIVE_THEME_CHANGE` with `action: THEME_CHANGED`.

use serde::Serialize;

use crate::domain::foundation::{
    ActivityId, ClientId, CoursewareElementId, DomainError, ElementType,
};
use crate::domain::rtm::{
    topic, Consumable, EventDescriptor, Producer, RoutedPayload, RtmSubscription,
};

/// Wire `type` of every author activity notification.
pub const BROADCAST_TYPE: &str = "author.activity.broadcast";

pub const CREATED: EventDescriptor = EventDescriptor::new("CREATED", "CREATED");
pub const UPDATED: EventDescriptor = EventDescriptor::new("UPDATED", "UPDATED");
pub const DELETED: EventDescriptor = EventDescriptor::new("DELETED", "DELETED");
pub const MOVED: EventDescriptor = EventDescriptor::new("MOVED", "REORDERED");
pub const CONFIG_CHANGE: EventDescriptor = EventDescriptor::new("CONFIG_CHANGE", "CONFIG_CHANGED");
pub const THEME_CHANGE: EventDescriptor = EventDescriptor::new("THEME_CHANGE", "THEME_CHANGED");

/// Every base descriptor in the family.
pub fn events() -> Vec<EventDescriptor> {
    vec![CREATED, UPDATED, DELETED, MOVED, CONFIG_CHANGE, THEME_CHANGE]
}

/// Payload of an author activity notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBroadcast {
    pub activity_id: ActivityId,
    pub element_id: CoursewareElementId,
    pub element_type: ElementType,
    pub parent_element_id: Option<CoursewareElementId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

impl RoutedPayload for ActivityBroadcast {
    fn topic(&self) -> String {
        topic::author_activity(&self.activity_id)
    }
}

/// Parameters an authoring service passes after mutating an element.
#[derive(Debug, Clone)]
pub struct ActivityChange {
    /// Unscoped descriptor; the producer scopes it to `element_type`.
    pub event: EventDescriptor,
    pub activity_id: ActivityId,
    pub element_id: CoursewareElementId,
    pub element_type: ElementType,
    pub parent_element_id: Option<CoursewareElementId>,
    pub config: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityProducer;

impl Producer for ActivityProducer {
    type Params = ActivityChange;

    fn build(&self, origin: &ClientId, change: ActivityChange) -> Result<Consumable, DomainError> {
        let payload = ActivityBroadcast {
            activity_id: change.activity_id,
            element_id: change.element_id,
            element_type: change.element_type,
            parent_element_id: change.parent_element_id,
            config: change.config,
        };

        Consumable::from_payload(
            origin.clone(),
            change.event.for_element(change.element_type),
            BROADCAST_TYPE,
            &payload,
        )
    }
}

/// Subscription to everything that happens under one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySubscription {
    pub activity_id: ActivityId,
}

impl RtmSubscription for ActivitySubscription {
    fn name(&self) -> &'static str {
        topic::AUTHOR_ACTIVITY
    }

    fn topic(&self) -> String {
        topic::author_activity(&self.activity_id)
    }

    fn events(&self) -> Vec<EventDescriptor> {
        events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn change(event: EventDescriptor, element_type: ElementType) -> ActivityChange {
        ActivityChange {
            event,
            activity_id: ActivityId::new(),
            element_id: CoursewareElementId::new(),
            element_type,
            parent_element_id: None,
            config: None,
        }
    }

    #[test]
    fn build_scopes_event_to_element_type() {
        let consumable = ActivityProducer
            .build(&ClientId::new(), change(THEME_CHANGE, ElementType::Activity))
            .unwrap();

        assert_eq!(consumable.descriptor().effective_name(), "ACTIVITY_THEME_CHANGE");
        assert_eq!(consumable.descriptor().legacy_name(), "THEME_CHANGED");
        assert_eq!(consumable.broadcast_type(), BROADCAST_TYPE);
    }

    #[test]
    fn build_routes_on_activity_topic() {
        let params = change(UPDATED, ElementType::Interactive);
        let expected = topic::author_activity(&params.activity_id);

        let consumable = ActivityProducer.build(&ClientId::new(), params).unwrap();

        assert_eq!(consumable.topic(), expected);
    }

    #[test]
    fn build_flattens_payload() {
        let mut params = change(CONFIG_CHANGE, ElementType::Component);
        params.config = Some("{\"title\":\"x\"}".to_string());
        let element_id = params.element_id;

        let consumable = ActivityProducer.build(&ClientId::new(), params).unwrap();
        let payload = consumable.payload();

        assert_eq!(payload.get("elementId"), Some(&json!(element_id.to_string())));
        assert_eq!(payload.get("elementType"), Some(&json!("COMPONENT")));
        assert_eq!(payload.get("config"), Some(&json!("{\"title\":\"x\"}")));
        assert_eq!(payload.get("parentElementId"), None);
    }

    #[test]
    fn subscription_covers_every_base_event() {
        let subscription = ActivitySubscription {
            activity_id: ActivityId::new(),
        };

        assert_eq!(subscription.events().len(), 6);
        assert!(subscription
            .events()
            .iter()
            .all(|e| e.element_type().is_none()));
        assert_eq!(subscription.topic(), topic::author_activity(&subscription.activity_id));
    }

    #[test]
    fn concurrent_builds_do_not_interfere() {
        let producer = Arc::new(ActivityProducer);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let producer = Arc::clone(&producer);
                thread::spawn(move || {
                    let params = change(CREATED, ElementType::Pathway);
                    let expected = topic::author_activity(&params.activity_id);
                    let consumable = producer.build(&ClientId::new(), params).unwrap();
                    (expected, consumable)
                })
            })
            .collect();

        for handle in handles {
            let (expected, consumable) = handle.join().unwrap();
            assert_eq!(consumable.topic(), expected);
        }
    }
}
