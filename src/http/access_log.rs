//! Access logging middleware.
//!
//! One event per request once the response is known. The level follows the
//! status class so successful traffic stays at debug. Health probes are
//! skipped unless `log_health_requests` is set, to keep orchestrator polling
//! out of the logs.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::config::RelayConfig;
use crate::http::request::X_REQUEST_ID;

#[derive(Debug, Clone)]
pub struct AccessLogSettings {
    health_path: Arc<str>,
    log_health_requests: bool,
}

impl AccessLogSettings {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            health_path: Arc::from(config.routes.health_path.as_str()),
            log_health_requests: config.observability.log_health_requests,
        }
    }

    pub fn should_log(&self, path: &str) -> bool {
        self.log_health_requests || path != &*self.health_path
    }
}

pub async fn access_log(
    State(settings): State<AccessLogSettings>,
    request: Request,
    next: Next,
) -> Response {
    if !settings.should_log(request.uri().path()) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    match severity(status) {
        Severity::Debug => tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "HTTP request"
        ),
        Severity::Warn => tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "HTTP request"
        ),
        Severity::Error => tracing::error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "HTTP request"
        ),
    }

    response
}

#[derive(Debug, PartialEq, Eq)]
enum Severity {
    Debug,
    Warn,
    Error,
}

fn severity(status: StatusCode) -> Severity {
    if status.is_server_error() {
        Severity::Error
    } else if status.is_client_error() {
        Severity::Warn
    } else {
        Severity::Debug
    }
}
