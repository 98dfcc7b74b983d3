use std::time::Instant;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        RawQuery, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use crate::http::request::X_REQUEST_ID;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `POST <listen_path>`: relay a media-server webhook downstream.
pub async fn relay_webhook(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let start = Instant::now();

    let result = state
        .relay
        .relay(multipart, query.as_deref(), headers.get(X_REQUEST_ID))
        .await;

    let outcome = match &result {
        Ok(outcome) => outcome.outcome(),
        Err(e) => e.outcome(),
    };
    metrics::record_relay(outcome, start);

    result.into_response()
}
