//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relay requests by outcome
//! - `relay_request_duration_seconds` (histogram): relay latency by outcome
//! - `relay_forward_duration_seconds` (histogram): downstream call latency
//!
//! Outcomes: `forwarded`, `empty`, `malformed`, `unauthorized`,
//! `forward_failed`. Without an installed exporter every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`. Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!("relay_requests_total", "Relay requests by outcome");
    metrics::describe_histogram!(
        "relay_request_duration_seconds",
        metrics::Unit::Seconds,
        "Time spent handling a relay request"
    );
    metrics::describe_histogram!(
        "relay_forward_duration_seconds",
        metrics::Unit::Seconds,
        "Time spent waiting on the downstream"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_relay(outcome: &'static str, start: Instant) {
    metrics::counter!("relay_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_forward(success: bool, start: Instant) {
    let result = if success { "ok" } else { "error" };
    metrics::histogram!("relay_forward_duration_seconds", "result" => result)
        .record(start.elapsed().as_secs_f64());
}
