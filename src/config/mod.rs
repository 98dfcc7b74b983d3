//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (--config / CONFIG_FILE)
//!     → loader.rs (parse & deserialize into RelayConfig)
//!     → cli.rs (flags / environment variables override fields)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults, so an empty environment is a valid setup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve, ConfigError};
pub use schema::{
    ForwardConfig, LimitsConfig, ListenerConfig, LogFormat, LogLevel, ObservabilityConfig,
    RelayConfig, RoutesConfig,
};
pub use validation::{validate_config, ValidationError};
