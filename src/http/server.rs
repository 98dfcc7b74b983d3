//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for the relay, self-test and health routes
//! - Wire up middleware (request id, access log, body limit, timeout)
//! - Bind server to listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::RelayConfig;
use crate::http::access_log::{access_log, AccessLogSettings};
use crate::http::health::health;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::self_test::self_test;
use crate::relay::handler::relay_webhook;
use crate::relay::{ForwardError, RelayService};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    relay: Arc<RelayService>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ForwardError> {
        let relay = Arc::new(RelayService::from_config(&config)?);
        let state = AppState {
            relay: relay.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            relay,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let routes = &config.routes;
        let access_log_settings = AccessLogSettings::from_config(config);

        Router::new()
            .route(&routes.listen_path, post(relay_webhook))
            .route(&routes.self_test_path, post(self_test))
            .route(&routes.health_path, get(health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.limits.request_timeout_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(DefaultBodyLimit::disable())
            .layer(middleware::from_fn_with_state(
                access_log_settings,
                access_log,
            ))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server on `listener` until `shutdown` fires.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Stopping server");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn relay(&self) -> &RelayService {
        &self.relay
    }
}
