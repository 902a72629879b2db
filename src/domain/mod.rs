//! Domain layer containing the real-time messaging types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, element types, errors)
//! - `rtm` - Event descriptors, consumables, producers, topics, wire rendering
//! - `diffsync` - Handshake message kinds and bodies carried over a channel

pub mod diffsync;
pub mod foundation;
pub mod rtm;
