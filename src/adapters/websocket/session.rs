//! Outbound session backed by an unbounded channel.
//!
//! `send_async` only enqueues. The connection's writer task drains the
//! receiver into the socket, so bus dispatch never waits on network I/O.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use crate::ports::{SessionError, WebSocketSession};

/// Queue-backed [`WebSocketSession`] owned by one connection.
#[derive(Debug)]
pub struct OutboundSession {
    tx: mpsc::UnboundedSender<String>,
    open: AtomicBool,
}

impl OutboundSession {
    /// Creates a session and the receiver its writer task drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            tx,
            open: AtomicBool::new(true),
        };
        (session, rx)
    }

    /// Marks the session closed. Later writes fail with [`SessionError::Closed`].
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}

impl WebSocketSession for OutboundSession {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    fn send_async(&self, text: String) -> Result<(), SessionError> {
        if !self.open.load(Ordering::Acquire) {
            return Err(SessionError::Closed);
        }
        self.tx.send(text).map_err(|_| SessionError::Closed)
    }
}
