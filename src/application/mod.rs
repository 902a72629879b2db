//! Application layer - Orchestrates domain types over the ports.

pub mod rtm;

pub use rtm::{Consumer, Delivery, RtmPublisher, SubscriptionKey, SubscriptionRegistry};
