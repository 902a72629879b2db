//! Producer contract.

use crate::domain::foundation::{ClientId, DomainError};

use super::Consumable;

/// Builds a consumable from the parameters a domain service has at hand.
///
/// Producers are stateless: `build` returns a new consumable on every call
/// and never keeps it, so one producer can be shared across threads.
///
/// # Example
///
/// ```ignore
/// let consumable = ActivityProducer.build(&client_id, change)?;
/// bus.publish(consumable.topic(), consumable.clone()).await?;
/// ```
pub trait Producer: Send + Sync {
    /// Call-site parameters for this notification family.
    type Params;

    fn build(&self, origin: &ClientId, params: Self::Params) -> Result<Consumable, DomainError>;
}
