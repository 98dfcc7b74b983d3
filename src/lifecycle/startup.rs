//! Startup orchestration.
//!
//! Order: metrics exporter, relay state, listener, signal handling, serve.
//! Any failure before serving is fatal.

use std::net::{AddrParseError, SocketAddr};

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_listener;
use crate::observability::metrics::init_metrics;
use crate::relay::ForwardError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to set up forwarding: {0}")]
    Forward(#[from] ForwardError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bring the relay up and serve until a termination signal arrives.
pub async fn start(config: RelayConfig) -> Result<(), StartupError> {
    if let Some(addr) = &config.observability.metrics_address {
        init_metrics(addr.parse()?)?;
    }

    let server = HttpServer::new(config)?;

    let address = server.config().bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(StartupError::Serve)?;

    announce(&server, local_addr);

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    server
        .run(listener, shutdown_rx)
        .await
        .map_err(StartupError::Serve)
}

fn announce(server: &HttpServer, local_addr: SocketAddr) {
    let relay = server.relay();
    let routes = &server.config().routes;

    tracing::info!(address = %local_addr, "Server listening on port {}", local_addr.port());

    if relay.target().is_self_test() {
        tracing::warn!("POST_URL not defined - using self-test endpoint");
    }
    tracing::info!(forward_url = %relay.target().url(), "Proxying requests");

    if relay.allow_list().is_restricted() {
        tracing::info!(
            allowed_clients = relay.allow_list().len(),
            "Client allow-list active"
        );
    } else {
        tracing::info!("No client allow-list configured, accepting all clients");
    }

    tracing::info!(
        listen_path = %routes.listen_path,
        self_test_path = %routes.self_test_path,
        health_path = %routes.health_path,
        "Ready to receive requests"
    );
}
