//! Diff-sync handshake vocabulary carried over a channel.

mod exchangeable;
mod message;

pub use exchangeable::{
    Ack, End, Exchangeable, ExchangeableType, Patch, RawExchangeable, Start, Version,
};
pub use message::Message;
