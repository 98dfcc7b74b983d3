//! Webhook relay subsystem.
//!
//! # Data Flow
//! ```text
//! POST <listen_path> (multipart/form-data)
//!     → payload.rs (read `payload` field, skip file parts, parse JSON)
//!     → allow_list.rs (Player.uuid must be allowed when a list is set)
//!     → forward.rs (single POST to the forward target, query appended)
//!     → downstream status + body, or a RelayError response
//! ```
//!
//! # Design Decisions
//! - One forwarding attempt per request, no retries
//! - Allow-list and forward target are fixed at startup
//! - A JSON-falsy payload is answered with an empty 200

pub mod allow_list;
pub mod error;
pub mod forward;
pub mod handler;
pub mod payload;
pub mod service;

pub use allow_list::AllowList;
pub use error::RelayError;
pub use forward::{ForwardError, ForwardTarget, ForwardedResponse, Forwarder};
pub use payload::{Payload, PayloadError};
pub use service::{RelayOutcome, RelayService};
