//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the messaging core to external systems:
//! - `bus` - Bus implementations (in-memory, Redis)
//! - `websocket` - Client connections, sessions and the diff-sync channel

pub mod bus;
pub mod websocket;

pub use bus::{InMemoryBus, RedisBus};
pub use websocket::{ConnectionContext, MessageTypeBridge, OutboundSession, SessionChannel};
