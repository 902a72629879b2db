//! Bus implementations.
//!
//! - [`InMemoryBus`] - single process, inline ordered delivery, test helpers
//! - [`RedisBus`] - Redis pub/sub fanout across processes

mod in_memory;
mod redis;

pub use self::in_memory::InMemoryBus;
pub use self::redis::{channel_name, channel_pattern, decode_frame, reconnect_delay, RedisBus};
