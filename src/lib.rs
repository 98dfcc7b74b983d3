//! Plex webhook relay library.
//!
//! ```text
//!   Plex server                         plex-relay                          downstream
//!  ─────────────  multipart POST  ┌──────────────────────┐  JSON POST   ─────────────
//!  │ payload=…  │ ──────────────▶ │ http → relay         │ ───────────▶ │ forward    │
//!  │ thumb=…    │                 │  payload / allow-list│              │ target     │
//!  │            │ ◀────────────── │  forward             │ ◀─────────── │            │
//!  ─────────────  status + body   └──────────────────────┘ status+body  ─────────────
//! ```

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
