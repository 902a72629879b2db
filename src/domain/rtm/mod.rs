//! Real-time messaging (RTM) domain types.
//!
//! # Event Flow
//!
//! ```text
//! domain mutation
//!        │ Producer::build
//!        ▼
//!   Consumable ── topic ──▶ Bus::publish
//!                                │
//!                                ▼
//!                      Consumer (one per subscribed client)
//!                      echo check → render → session write
//! ```
//!
//! This module holds the pure parts: descriptors and their decoration,
//! payload flattening, topic naming, the consumable itself and its wire
//! rendering. Delivery lives in `application::rtm`.

mod consumable;
mod event;
pub mod families;
mod message;
mod payload;
mod producer;
mod subscription;
pub mod topic;

pub use consumable::{Consumable, RoutedPayload};
pub use event::{effective_name, EventDescriptor};
pub use message::{BroadcastMessage, ACTION_FIELD, RTM_EVENT_FIELD};
pub use payload::{fields_of, BroadcastPayload};
pub use producer::Producer;
pub use subscription::RtmSubscription;
