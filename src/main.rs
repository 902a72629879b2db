//! Courseware RTM server binary.
//!
//! Loads configuration, selects the bus backend and serves the WebSocket
//! endpoint until Ctrl-C or SIGTERM.

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use courseware_rtm::adapters::bus::{InMemoryBus, RedisBus};
use courseware_rtm::adapters::websocket::{websocket_router, WebSocketState};
use courseware_rtm::config::{AppConfig, BusBackend, ServerConfig};
use courseware_rtm::domain::foundation::{DomainError, ErrorCode};
use courseware_rtm::ports::Bus;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let bus = connect_bus(&config).await?;
    let app = websocket_router(&config.server.ws_path)
        .with_state(WebSocketState::new(bus))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        ws_path = %config.server.ws_path,
        backend = ?config.bus.backend,
        "Courseware RTM listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Courseware RTM stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

async fn connect_bus(config: &AppConfig) -> Result<Arc<dyn Bus>, DomainError> {
    match config.bus.backend {
        BusBackend::InMemory => Ok(Arc::new(InMemoryBus::new())),
        BusBackend::Redis => {
            let client = redis::Client::open(config.redis.url.as_str())
                .map_err(|e| DomainError::new(ErrorCode::BusUnavailable, e.to_string()))?;

            let bus = tokio::time::timeout(
                config.redis.timeout(),
                RedisBus::connect(
                    client,
                    config.bus.channel_prefix.clone(),
                    config.redis.reconnect_max(),
                ),
            )
            .await
            .map_err(|_| DomainError::new(ErrorCode::BusUnavailable, "Redis connect timed out"))??;

            Ok(Arc::new(bus))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
