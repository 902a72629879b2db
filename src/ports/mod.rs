//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the messaging core and the outside world. Adapters implement these ports.
//!
//! - `Bus` - Publish/subscribe transport between server processes
//! - `BusListener` - Callback invoked for consumables on a topic
//! - `WebSocketSession` - Non-blocking writer for one client connection
//! - `Channel` - Send/receive primitive used by diff-sync

mod bus;
mod channel;
mod session;

pub use bus::{Bus, BusListener, ListenerHandle};
pub use channel::Channel;
pub use session::{SessionError, WebSocketSession};
