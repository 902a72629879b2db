//! Channel port - Synchronous send/receive primitive over one connection.

use async_trait::async_trait;

use crate::domain::diffsync::Message;
use crate::domain::foundation::DomainError;

/// A bidirectional message channel bound to one client.
///
/// Used to carry the diff-sync handshake between server and client.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Writes a message to the bound client.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the body has no type
    /// - `UnsupportedOperation` if the type has no wire mapping
    /// - `ChannelOperationFailed` if the session write failed
    async fn send(&self, message: Message) -> Result<(), DomainError>;

    /// Accepts a message from the client side.
    async fn receive(&self, message: Message) -> Result<(), DomainError>;
}
