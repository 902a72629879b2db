//! WebSocket upgrade handler for real-time messaging connections.
//!
//! Manages the connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Open a connection context (client id, session, registry)
//! 3. Send the connected greeting
//! 4. Pump outbound frames and dispatch inbound requests until disconnect
//! 5. Tear down every subscription

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};

use crate::ports::Bus;

use super::connection::ConnectionContext;
use super::messages::ServerMessage;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub bus: Arc<dyn Bus>,
}

impl WebSocketState {
    pub fn new(bus: Arc<dyn Bus>) -> Self {
        Self { bus }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Authentication happens upstream; every upgraded socket gets a fresh
/// client id.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();
    let (context, mut outbound) = ConnectionContext::open(state.bus);
    let context = Arc::new(context);
    let client_id = context.client_id().clone();

    tracing::debug!(client_id = %client_id, "Client connected");

    let connected = ServerMessage::connected(&client_id, chrono::Utc::now().to_rfc3339());
    if let Err(e) = context.send(&connected) {
        tracing::debug!(client_id = %client_id, error = %e, "Failed to queue connected message");
        context.close().await;
        return;
    }

    // Drain the session queue into the socket
    let mut send_task = {
        let client_id = client_id.clone();
        tokio::spawn(async move {
            while let Some(text) = outbound.recv().await {
                if let Err(e) = sender.send(Message::Text(text)).await {
                    tracing::debug!(client_id = %client_id, error = %e, "Send error, closing connection");
                    break;
                }
            }
        })
    };

    // Handle incoming messages from client
    let mut recv_task = {
        let context = Arc::clone(&context);
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        if let Err(e) = context.respond(&text).await {
                            tracing::debug!(
                                client_id = %context.client_id(),
                                error = %e,
                                "Failed to queue reply"
                            );
                            break;
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(
                            client_id = %context.client_id(),
                            "Received unsupported binary message"
                        );
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                        // Protocol-level heartbeats are answered by axum
                    }
                    Ok(Message::Close(_)) => {
                        tracing::debug!(client_id = %context.client_id(), "Client sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(client_id = %context.client_id(), error = %e, "Receive error");
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    let removed = context.close().await;
    tracing::debug!(client_id = %client_id, removed, "Client disconnected");
}

/// Create axum router for the WebSocket endpoint at `path`.
///
/// # Example
///
/// ```ignore
/// let app = websocket_router("/ws").with_state(WebSocketState::new(bus));
/// ```
pub fn websocket_router(path: &str) -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route(path, get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::bus::InMemoryBus;

    #[test]
    fn websocket_state_shares_bus() {
        let bus: Arc<dyn Bus> = Arc::new(InMemoryBus::new());
        let state = WebSocketState::new(bus.clone());

        assert!(Arc::ptr_eq(&state.bus, &bus));
    }

    #[test]
    fn websocket_router_creates_route() {
        let _router = websocket_router("/ws");
    }
}
