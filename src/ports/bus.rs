//! Bus port - Interface for distributing consumables between processes.
//!
//! This port defines how producers publish and how per-connection consumers
//! listen, without knowing about the transport (in-process, Redis, ...).

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::foundation::DomainError;
use crate::domain::rtm::Consumable;

/// Listener invoked for every consumable published on a subscribed topic.
///
/// Implementations should be:
/// - **Quick** - the bus awaits listeners on its dispatch path
/// - **Isolated** - an error is logged by the bus and never reaches other
///   listeners on the same topic
#[async_trait]
pub trait BusListener: Send + Sync {
    async fn on_message(&self, consumable: &Consumable) -> Result<(), DomainError>;

    /// Listener name for logging.
    fn name(&self) -> &'static str;
}

/// Handle returned by [`Bus::subscribe`], needed to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    id: Uuid,
    topic: String,
}

impl ListenerHandle {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl fmt::Display for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.topic, self.id)
    }
}

/// Port for the publish/subscribe transport.
///
/// Implementations must ensure:
/// - Delivery to every listener whose subscription is active at publish
///   time (at-least-once); nothing is buffered for late subscribers
/// - Within one topic, listeners see consumables in publish order
/// - A failing listener does not stop delivery to the others
///
/// Publishing is best-effort. Errors mean the bus could not accept the
/// consumable at all; this layer never retries.
///
/// # Example
///
/// ```ignore
/// let consumable = producer.build(&client_id, change)?;
/// bus.publish(consumable.topic(), consumable.clone()).await?;
/// ```
#[async_trait]
pub trait Bus: Send + Sync {
    async fn publish(&self, topic: &str, consumable: Consumable) -> Result<(), DomainError>;

    fn subscribe(&self, topic: &str, listener: Arc<dyn BusListener>) -> ListenerHandle;

    /// Removes a listener. Returns `false` if the handle was not registered.
    fn unsubscribe(&self, handle: &ListenerHandle) -> bool;
}
