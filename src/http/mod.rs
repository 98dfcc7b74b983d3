//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign / propagate x-request-id)
//!     → access_log.rs (one event per request, status-based level)
//!     → route:
//!         POST <listen_path>    → relay::handler
//!         POST <self_test_path> → self_test.rs
//!         GET  <health_path>    → health.rs
//! ```

pub mod access_log;
pub mod health;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
