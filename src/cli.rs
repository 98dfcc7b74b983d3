//! Command-line arguments. Every knob also reads from its environment variable,
//! which is how the relay is normally configured inside a container.

use std::path::PathBuf;

use clap::{builder::BoolishValueParser, Parser};

use crate::config::schema::{LogFormat, LogLevel, RelayConfig};
use crate::relay::allow_list::parse_client_ids;

#[derive(Parser, Debug, Default)]
#[command(name = "plex-relay", version)]
#[command(about = "Relays media-server webhooks to a downstream HTTP endpoint", long_about = None)]
pub struct Args {
    /// Optional TOML file providing base values
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Host to bind
    #[arg(long, env = "LISTEN_HOST")]
    pub listen_host: Option<String>,

    /// Port to bind
    #[arg(long, env = "LISTEN_PORT")]
    pub listen_port: Option<u16>,

    /// Path receiving webhooks
    #[arg(long, env = "LISTEN_PATH")]
    pub listen_path: Option<String>,

    /// Path of the diagnostic echo endpoint
    #[arg(long, env = "SELF_TEST_PATH")]
    pub self_test_path: Option<String>,

    /// Path of the liveness endpoint
    #[arg(long, env = "HEALTH_PATH")]
    pub health_path: Option<String>,

    /// Log hits on the health path
    #[arg(long, env = "LOG_HEALTH_REQUESTS", value_parser = BoolishValueParser::new())]
    pub log_health_requests: Option<bool>,

    /// Minimum log severity
    #[arg(long, env = "LOG_LEVEL", value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Log output encoding
    #[arg(long, env = "LOG_FORMAT", value_enum, ignore_case = true)]
    pub log_format: Option<LogFormat>,

    /// Address for the Prometheus metrics listener, e.g. 0.0.0.0:9090
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,

    /// Downstream URL; defaults to this relay's self-test endpoint
    #[arg(long, env = "POST_URL")]
    pub post_url: Option<String>,

    /// Comma-separated client identifiers allowed through
    #[arg(long, env = "ALLOWED_CLIENT_IDS")]
    pub allowed_client_ids: Option<String>,

    /// Timeout for the downstream call, in seconds
    #[arg(long, env = "FORWARD_TIMEOUT_SECS")]
    pub forward_timeout_secs: Option<u64>,

    /// Timeout for a whole inbound request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Maximum inbound body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Overwrite every field of `config` that was given on the command line or
    /// in the environment.
    pub fn apply_to(&self, config: &mut RelayConfig) {
        if let Some(host) = &self.listen_host {
            config.listener.host = host.clone();
        }
        if let Some(port) = self.listen_port {
            config.listener.port = port;
        }
        if let Some(path) = &self.listen_path {
            config.routes.listen_path = path.clone();
        }
        if let Some(path) = &self.self_test_path {
            config.routes.self_test_path = path.clone();
        }
        if let Some(path) = &self.health_path {
            config.routes.health_path = path.clone();
        }
        if let Some(flag) = self.log_health_requests {
            config.observability.log_health_requests = flag;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_address = Some(addr.clone());
        }
        // An empty POST_URL means "not configured".
        match self.post_url.as_deref().map(str::trim) {
            Some("") => config.forward.url = None,
            Some(url) => config.forward.url = Some(url.to_string()),
            None => {}
        }
        if let Some(ids) = &self.allowed_client_ids {
            config.forward.allowed_client_ids = parse_client_ids(ids);
        }
        if let Some(secs) = self.forward_timeout_secs {
            config.forward.timeout_secs = secs;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.limits.request_timeout_secs = secs;
        }
        if let Some(bytes) = self.max_body_bytes {
            config.limits.max_body_bytes = bytes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_leave_config_untouched() {
        let mut config = RelayConfig::default();
        Args::default().apply_to(&mut config);
        assert_eq!(config, RelayConfig::default());
    }

    #[test]
    fn flags_override_fields() {
        let args = Args::try_parse_from([
            "plex-relay",
            "--listen-port",
            "3001",
            "--listen-path",
            "/plex",
            "--log-health-requests",
            "yes",
            "--log-level",
            "DEBUG",
            "--post-url",
            "http://hooks.local/plex",
        ])
        .unwrap();

        let mut config = RelayConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.listener.port, 3001);
        assert_eq!(config.routes.listen_path, "/plex");
        assert!(config.observability.log_health_requests);
        assert_eq!(config.observability.log_level, LogLevel::Debug);
        assert_eq!(config.forward.url.as_deref(), Some("http://hooks.local/plex"));
    }

    #[test]
    fn empty_post_url_clears_target() {
        let mut config = RelayConfig::default();
        config.forward.url = Some("http://from-file.local".into());

        let args = Args {
            post_url: Some(String::new()),
            ..Args::default()
        };
        args.apply_to(&mut config);
        assert_eq!(config.forward.url, None);
    }
}
