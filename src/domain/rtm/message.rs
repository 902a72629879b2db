//! Wire rendering of broadcast notifications.
//!
//! ```text
//! {
//!   "type": "<broadcastType>",
//!   "replyTo": "<subscriptionInstanceId-or-null>",
//!   "response": { ...payload fields..., "rtmEvent": "<effectiveName>", "action": "<legacyName>" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::DomainError;

use super::Consumable;

/// Field carrying the decorated canonical event name.
pub const RTM_EVENT_FIELD: &str = "rtmEvent";

/// Field carrying the legacy event name.
pub const ACTION_FIELD: &str = "action";

/// A notification as written to a subscriber's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(rename = "replyTo")]
    pub reply_to: Option<String>,
    pub response: Map<String, Value>,
}

impl BroadcastMessage {
    /// Renders a consumable. The event names come from the consumable's own
    /// descriptor and win over payload fields of the same name.
    pub fn render(consumable: &Consumable) -> Self {
        let descriptor = consumable.descriptor();
        let mut response = consumable.payload().fields().clone();
        response.insert(
            RTM_EVENT_FIELD.to_string(),
            Value::String(descriptor.effective_name()),
        );
        response.insert(
            ACTION_FIELD.to_string(),
            Value::String(descriptor.legacy_name().to_string()),
        );

        Self {
            message_type: consumable.broadcast_type().to_string(),
            reply_to: Some(consumable.subscription_instance_id().to_string()),
            response,
        }
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ClientId, ElementType};
    use crate::domain::rtm::{EventDescriptor, RoutedPayload};
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Renamed {
        element_id: String,
        parent_id: Option<String>,
        action: String,
    }

    impl RoutedPayload for Renamed {
        fn topic(&self) -> String {
            format!("element/{}", self.element_id)
        }
    }

    fn consumable(parent_id: Option<&str>) -> Consumable {
        Consumable::from_payload(
            ClientId::parse("a").unwrap(),
            EventDescriptor::new("RENAMED", "UPDATED").for_element(ElementType::Interactive),
            "author.element.broadcast",
            &Renamed {
                element_id: "e1".to_string(),
                parent_id: parent_id.map(str::to_string),
                action: "payload-value".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn render_builds_documented_shape() {
        let consumable = consumable(Some("p1"));
        let message = BroadcastMessage::render(&consumable);
        let json: Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();

        assert_eq!(json["type"], "author.element.broadcast");
        assert_eq!(
            json["replyTo"],
            json!(consumable.subscription_instance_id().to_string())
        );
        assert_eq!(json["response"]["elementId"], "e1");
        assert_eq!(json["response"]["parentId"], "p1");
        assert_eq!(json["response"]["rtmEvent"], "INTERACTIVE_RENAMED");
    }

    #[test]
    fn event_names_override_payload_fields() {
        let message = BroadcastMessage::render(&consumable(None));
        assert_eq!(message.response["action"], json!("UPDATED"));
    }

    #[test]
    fn absent_fields_render_as_null() {
        let message = BroadcastMessage::render(&consumable(None));
        assert_eq!(message.response["parentId"], Value::Null);
    }

    #[test]
    fn missing_reply_to_serializes_as_null() {
        let message = BroadcastMessage {
            message_type: "t".to_string(),
            reply_to: None,
            response: Map::new(),
        };
        let json: Value = serde_json::to_value(&message).unwrap();
        assert_eq!(json["replyTo"], Value::Null);
    }
}
