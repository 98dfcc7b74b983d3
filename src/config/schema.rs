//! Configuration schema definitions.
//!
//! Every section derives Serde traits so a TOML file can supply any subset of
//! fields; anything missing falls back to the defaults below.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Paths of the three routes the relay serves.
    pub routes: RoutesConfig,

    /// Downstream target and client filtering.
    pub forward: ForwardConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// URL of this relay's own self-test endpoint, used when no forward URL is set.
    pub fn self_test_url(&self) -> String {
        format!(
            "http://localhost:{}{}",
            self.listener.port, self.routes.self_test_path
        )
    }

    /// The `host:port` string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.host, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Route paths.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path receiving webhook POSTs from the media server.
    pub listen_path: String,

    /// Diagnostic echo path. Also the default forward target.
    pub self_test_path: String,

    /// Liveness probe path.
    pub health_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            listen_path: "/".to_string(),
            self_test_path: "/self-test".to_string(),
            health_path: "/health".to_string(),
        }
    }
}

/// Forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ForwardConfig {
    /// Downstream URL. `None` means "use the self-test endpoint".
    pub url: Option<String>,

    /// Client identifiers allowed through. Empty = unrestricted.
    pub allowed_client_ids: Vec<String>,

    /// Upper bound on the outbound call, in seconds.
    pub timeout_secs: u64,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            url: None,
            allowed_client_ids: Vec::new(),
            timeout_secs: 30,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes. Plex thumbnails count towards it.
    pub max_body_bytes: usize,

    /// Total time allowed for handling one inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
            request_timeout_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Minimum severity emitted.
    pub log_level: LogLevel,

    /// Output encoding of log events.
    pub log_format: LogFormat,

    /// Whether hits on the health path show up in the access log.
    pub log_health_requests: bool,

    /// Prometheus listener address. Metrics are only exported when set.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Json,
            log_health_requests: false,
            metrics_address: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable output for local development.
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [listener]
            port = 3000

            [forward]
            allowed_client_ids = ["abc123"]
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.routes, RoutesConfig::default());
        assert_eq!(config.forward.allowed_client_ids, vec!["abc123".to_string()]);
        assert_eq!(config.forward.timeout_secs, 30);
        assert_eq!(config.observability.log_level, LogLevel::Info);
    }

    #[test]
    fn self_test_url_uses_port_and_path() {
        let mut config = RelayConfig::default();
        config.listener.port = 9000;
        config.routes.self_test_path = "/echo".into();
        assert_eq!(config.self_test_url(), "http://localhost:9000/echo");
    }

    #[test]
    fn log_enums_parse_lowercase() {
        let config: ObservabilityConfig =
            toml::from_str("log_level = \"debug\"\nlog_format = \"pretty\"").unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}
