//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use plex_relay::{HttpServer, RelayConfig, Shutdown};
use reqwest::multipart::{Form, Part};
use tokio::net::TcpListener;

/// A request the mock downstream received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: &'static str,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Downstream stand-in answering every POST to `/hook` with a fixed response.
pub struct MockDownstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockDownstream {
    pub async fn start(status: u16, body: &'static str) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status: StatusCode::from_u16(status).unwrap(),
            body,
            calls: calls.clone(),
        };

        let app = Router::new().route("/hook", post(record)).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, calls }
    }

    pub fn url(&self) -> String {
        format!("http://{}/hook", self.addr)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<MockState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.calls.lock().unwrap().push(RecordedCall {
        query,
        headers,
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

/// A relay running on an ephemeral loopback port. Stops when dropped.
pub struct TestRelay {
    pub addr: SocketAddr,
    _shutdown: Shutdown,
}

impl TestRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a relay. The listener port is written into `config` before the
/// server is built, so the self-test fallback points at this instance.
pub async fn start_relay(mut config: RelayConfig) -> TestRelay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = addr.port();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestRelay {
        addr,
        _shutdown: shutdown,
    }
}

/// Config forwarding to `downstream` with the given allow-list.
pub fn config_for(downstream: &MockDownstream, allowed: &[&str]) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.forward.url = Some(downstream.url());
    config.forward.allowed_client_ids = allowed.iter().map(|s| s.to_string()).collect();
    config
}

/// Multipart body shaped like a Plex webhook: JSON `payload` plus a `thumb` JPEG.
pub fn plex_form(payload: &str) -> Form {
    Form::new()
        .text("payload", payload.to_string())
        .part("thumb", thumb())
}

pub fn thumb() -> Part {
    Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46])
        .file_name("thumb.jpg")
        .mime_str("image/jpeg")
        .unwrap()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
