//! Application configuration loaded from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use gateway::GatewayConfig;

const DEFAULT_BACKEND_API: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_PAGE_SIZE: usize = 12;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Storefront configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `BACKEND_API`: base URL of the OTP and recommendation endpoints (default: `"http://localhost:5000"`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for text
/// - `REQUEST_TIMEOUT_SECS`: deadline for catalog reads and HTTP calls (default: `15`)
/// - `PAGE_SIZE`: products per catalog page (default: `12`)
/// - `METRICS_ADDR`: address for the metrics listener (disabled when unset)
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_api: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub request_timeout: Duration,
    pub page_size: usize,
    pub metrics_addr: Option<SocketAddr>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from `lookup`. Unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            backend_api: lookup("BACKEND_API")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.backend_api),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
            request_timeout: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            page_size: lookup("PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            metrics_addr: lookup("METRICS_ADDR").and_then(|s| s.parse().ok()),
        }
    }

    /// Catalog tunables derived from this configuration.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            page_size: self.page_size,
            request_timeout: self.request_timeout,
            ..GatewayConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_api: DEFAULT_BACKEND_API.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            metrics_addr: None,
        }
    }
}
