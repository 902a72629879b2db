//! WebSocket adapters for real-time messaging.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                               Bus                                   │
//! │        InMemoryBus (single process) │ RedisBus (multi-process)      │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                  │ one Consumer per (topic, event)
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   ConnectionContext (per socket)                    │
//! │   SubscriptionRegistry ── Consumer ──▶ OutboundSession (queue)      │
//! │   SessionChannel (diff-sync) ───────▶ OutboundSession               │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                  │ writer task
//!                                  ▼
//!                              WebSocket
//! ```
//!
//! # Components
//!
//! - [`messages`] - inbound requests and server replies
//! - [`session`] - non-blocking outbound session
//! - [`bridge`] - diff-sync kind to wire type mapping
//! - [`channel`] - diff-sync channel bound to one client
//! - [`connection`] - per-connection state and request dispatch
//! - [`handler`] - axum upgrade handler

pub mod bridge;
pub mod channel;
pub mod connection;
pub mod handler;
pub mod messages;
pub mod session;

pub use bridge::MessageTypeBridge;
pub use channel::SessionChannel;
pub use connection::ConnectionContext;
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::{ClientMessage, ServerMessage};
pub use session::OutboundSession;
