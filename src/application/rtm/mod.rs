//! Delivery side of real-time messaging.
//!
//! - [`RtmPublisher`] - build + publish after a mutation
//! - [`Consumer`] - per-client listener: echo suppression, render, write
//! - [`SubscriptionRegistry`] - per-connection subscribe/unsubscribe/teardown

mod consumer;
mod publisher;
mod registry;

pub use consumer::{Consumer, Delivery};
pub use publisher::RtmPublisher;
pub use registry::{SubscriptionKey, SubscriptionRegistry};
