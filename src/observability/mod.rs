//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (JSON lines or pretty text)
//!     → Prometheus scrape endpoint (only when configured)
//! ```

pub mod logging;
pub mod metrics;
