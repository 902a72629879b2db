//! RtmPublisher - builds and publishes a notification after a mutation.

use std::sync::Arc;

use crate::domain::foundation::{ClientId, DomainError};
use crate::domain::rtm::Producer;
use crate::ports::Bus;

/// Entry point used by domain services once a mutation has been persisted.
pub struct RtmPublisher {
    bus: Arc<dyn Bus>,
}

impl RtmPublisher {
    pub fn new(bus: Arc<dyn Bus>) -> Self {
        Self { bus }
    }

    /// Builds a consumable with `producer` and publishes it on its topic.
    ///
    /// Returns the consumable's instance name for the caller's audit log.
    pub async fn publish<P: Producer>(
        &self,
        producer: &P,
        origin: &ClientId,
        params: P::Params,
    ) -> Result<String, DomainError> {
        let consumable = producer.build(origin, params)?;
        let instance = consumable.instance_name();
        let topic = consumable.topic().to_string();

        self.bus.publish(&topic, consumable).await.map_err(|e| {
            tracing::warn!(instance = %instance, error = %e, "Failed to publish notification");
            e
        })?;

        tracing::debug!(instance = %instance, origin = %origin, "Published notification");
        Ok(instance)
    }
}
