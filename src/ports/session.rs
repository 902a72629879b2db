//! WebSocketSession port - Outbound side of one client connection.

/// Errors that can occur writing to a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The connection has already gone away
    #[error("Session is closed")]
    Closed,

    /// The transport refused the frame
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Port for writing text frames to one connected client.
///
/// The session is owned by its connection. This layer only writes to it and
/// never closes it. `send_async` must not block: it queues the frame and
/// returns.
pub trait WebSocketSession: Send + Sync {
    fn is_open(&self) -> bool;

    fn send_async(&self, text: String) -> Result<(), SessionError>;
}
