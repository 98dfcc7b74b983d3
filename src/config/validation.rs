//! Configuration validation.
//!
//! Serde covers the syntax; this module checks values that would otherwise
//! make axum panic at router construction or leave the relay pointing
//! nowhere. All violations are collected, not just the first.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{name} '{path}' {reason}")]
    InvalidPath {
        name: &'static str,
        path: String,
        reason: &'static str,
    },

    #[error("path '{0}' is used by more than one route")]
    DuplicatePath(String),

    #[error("forward url '{url}' is invalid: {reason}")]
    InvalidForwardUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("forward timeout ({forward}s) must be shorter than the request timeout ({request}s)")]
    ForwardTimeoutNotBelowRequestTimeout { forward: u64, request: u64 },

    #[error("listen port 0 cannot be combined with the default self-test forward target")]
    EphemeralPortWithSelfTest,

    #[error("metrics address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a loaded configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let routes = [
        ("listen path", &config.routes.listen_path),
        ("self-test path", &config.routes.self_test_path),
        ("health path", &config.routes.health_path),
    ];

    let mut seen = HashSet::new();
    for (name, path) in routes {
        if let Some(reason) = path_problem(path) {
            errors.push(ValidationError::InvalidPath {
                name,
                path: path.clone(),
                reason,
            });
        }
        if !seen.insert(path.as_str()) {
            errors.push(ValidationError::DuplicatePath(path.clone()));
        }
    }

    match &config.forward.url {
        Some(raw) => {
            if let Err(reason) = check_forward_url(raw) {
                errors.push(ValidationError::InvalidForwardUrl {
                    url: raw.clone(),
                    reason,
                });
            }
        }
        None if config.listener.port == 0 => {
            errors.push(ValidationError::EphemeralPortWithSelfTest);
        }
        None => {}
    }

    if config.forward.timeout_secs == 0 {
        errors.push(ValidationError::Zero("forward timeout"));
    }
    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("request timeout"));
    }
    // The outbound call has to time out before the inbound request does.
    let (forward, request) = (
        config.forward.timeout_secs,
        config.limits.request_timeout_secs,
    );
    if forward > 0 && request > 0 && forward >= request {
        errors.push(ValidationError::ForwardTimeoutNotBelowRequestTimeout { forward, request });
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("max body size"));
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn path_problem(path: &str) -> Option<&'static str> {
    if !path.starts_with('/') {
        return Some("must start with '/'");
    }
    if path.contains(['{', '}', '*']) {
        return Some("must not contain route captures or wildcards");
    }
    if path.split('/').any(|segment| segment.starts_with(':')) {
        return Some("must not contain segments starting with ':'");
    }
    None
}

fn check_forward_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}
