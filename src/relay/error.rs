use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::relay::forward::ForwardError;
use crate::relay::payload::PayloadError;

/// Request-scoped failures of the relay path. Each one ends the request.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    MalformedPayload(#[from] PayloadError),

    #[error("Unauthorized client")]
    UnauthorizedClient { client_id: Option<String> },

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            RelayError::UnauthorizedClient { .. } => StatusCode::FORBIDDEN,
            RelayError::Forward(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MalformedPayload(_) => "malformed",
            RelayError::UnauthorizedClient { .. } => "unauthorized",
            RelayError::Forward(_) => "forward_failed",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_status_codes() {
        let malformed = RelayError::from(PayloadError::Missing);
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let unauthorized = RelayError::UnauthorizedClient {
            client_id: Some("abc123".into()),
        };
        assert_eq!(unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(unauthorized.to_string(), "Unauthorized client");
        assert_eq!(unauthorized.into_response().status(), StatusCode::FORBIDDEN);
    }
}
