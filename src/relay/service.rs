//! The relay request path: extract, authorize, forward.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::multipart::{Multipart, MultipartRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::RelayConfig;
use crate::observability::metrics;
use crate::relay::allow_list::AllowList;
use crate::relay::error::RelayError;
use crate::relay::forward::{ForwardError, ForwardTarget, ForwardedResponse, Forwarder};
use crate::relay::payload::{extract_payload, Payload};

/// Successful end of a relay request.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The downstream answered; its status and body go back to the caller.
    Forwarded(ForwardedResponse),
    /// The payload was JSON-falsy; nothing was forwarded.
    Empty,
}

impl RelayOutcome {
    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayOutcome::Forwarded(_) => "forwarded",
            RelayOutcome::Empty => "empty",
        }
    }
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        match self {
            RelayOutcome::Forwarded(forwarded) => {
                let mut response = Response::new(Body::from(forwarded.body));
                *response.status_mut() = forwarded.status;
                if let Some(content_type) = forwarded.content_type {
                    response
                        .headers_mut()
                        .insert(header::CONTENT_TYPE, content_type);
                }
                response
            }
            RelayOutcome::Empty => StatusCode::OK.into_response(),
        }
    }
}

/// Immutable state shared by all relay requests.
#[derive(Debug)]
pub struct RelayService {
    allow_list: AllowList,
    forwarder: Forwarder,
}

impl RelayService {
    pub fn new(allow_list: AllowList, forwarder: Forwarder) -> Self {
        Self {
            allow_list,
            forwarder,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, ForwardError> {
        let target = ForwardTarget::from_config(config)?;
        let forwarder = Forwarder::new(target, Duration::from_secs(config.forward.timeout_secs))?;
        let allow_list = AllowList::new(config.forward.allowed_client_ids.iter().cloned());
        Ok(Self::new(allow_list, forwarder))
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn target(&self) -> &ForwardTarget {
        self.forwarder.target()
    }

    /// Check the payload's client identifier against the allow-list.
    pub fn authorize(&self, payload: &Payload) -> Result<(), RelayError> {
        let client_id = payload.client_id();
        if self.allow_list.permits(client_id) {
            return Ok(());
        }

        tracing::warn!(
            client_id = client_id.unwrap_or("<none>"),
            "Request from client is not allowed"
        );
        Err(RelayError::UnauthorizedClient {
            client_id: client_id.map(String::from),
        })
    }

    /// Handle one inbound webhook.
    pub async fn relay(
        &self,
        multipart: Result<Multipart, MultipartRejection>,
        query: Option<&str>,
        request_id: Option<&HeaderValue>,
    ) -> Result<RelayOutcome, RelayError> {
        let payload = extract_payload(multipart).await.map_err(|e| {
            tracing::error!(error = %e, "Rejecting malformed payload");
            RelayError::from(e)
        })?;

        tracing::debug!(
            event = payload.event().unwrap_or("<none>"),
            client_id = payload.client_id().unwrap_or("<none>"),
            payload = %payload.as_value(),
            "Received payload"
        );

        if payload.is_empty() {
            tracing::debug!("Payload is empty, nothing to forward");
            return Ok(RelayOutcome::Empty);
        }

        self.authorize(&payload)?;

        tracing::debug!(
            forward_url = %self.target().url(),
            query = query.unwrap_or(""),
            "Forwarding request"
        );

        let start = Instant::now();
        let result = self.forwarder.forward(&payload, query, request_id).await;
        metrics::record_forward(result.is_ok(), start);

        match result {
            Ok(forwarded) => {
                tracing::debug!(
                    forward_url = %self.target().url(),
                    status = forwarded.status.as_u16(),
                    body = %String::from_utf8_lossy(&forwarded.body),
                    "Downstream responded"
                );
                Ok(RelayOutcome::Forwarded(forwarded))
            }
            Err(e) => {
                tracing::error!(error = %e, "Forwarding failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(allowed: &[&str]) -> RelayService {
        let mut config = RelayConfig::default();
        config.forward.url = Some("http://127.0.0.1:1/hook".into());
        config.forward.allowed_client_ids = allowed.iter().map(|s| s.to_string()).collect();
        RelayService::from_config(&config).unwrap()
    }

    #[test]
    fn authorize_against_allow_list() {
        let payload = Payload::new(json!({"Player": {"uuid": "abc123"}}));

        assert!(service(&[]).authorize(&payload).is_ok());
        assert!(service(&["abc123", "xyz789"]).authorize(&payload).is_ok());

        let err = service(&["xyz789"]).authorize(&payload).unwrap_err();
        assert!(matches!(
            err,
            RelayError::UnauthorizedClient { client_id: Some(ref id) } if id == "abc123"
        ));
    }

    #[test]
    fn payload_without_identifier_needs_open_list() {
        let payload = Payload::new(json!({"event": "media.play"}));
        assert!(service(&[]).authorize(&payload).is_ok());
        assert!(service(&["abc123"]).authorize(&payload).is_err());
    }

    #[test]
    fn empty_outcome_is_plain_ok() {
        let response = RelayOutcome::Empty.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn forwarded_outcome_copies_status_and_content_type() {
        let response = RelayOutcome::Forwarded(ForwardedResponse {
            status: StatusCode::ACCEPTED,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: axum::body::Bytes::from_static(b"{\"ok\":true}"),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
