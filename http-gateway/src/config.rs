use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpGatewayConfig {
    /// HTTP listen address
    pub http_addr: String,

    /// Base URL of the record service REST listener
    pub upstream_url: String,

    /// Bound on the whole upstream request, in seconds
    pub upstream_timeout_secs: u64,

    /// Service version
    pub version: String,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8002".to_string(),
            upstream_url: "http://127.0.0.1:8000".to_string(),
            upstream_timeout_secs: 5,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl HttpGatewayConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_GATEWAY_ADDR") {
            config.http_addr = addr;
        }

        if let Ok(url) = std::env::var("RECORD_HTTP_URL") {
            config.upstream_url = url;
        }

        if let Ok(timeout) = std::env::var("UPSTREAM_TIMEOUT_SECS") {
            config.set_upstream_timeout(&timeout);
        }

        config
    }

    /// Apply a textual timeout; zero or unparsable values keep the current one.
    pub fn set_upstream_timeout(&mut self, raw: &str) {
        match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => self.upstream_timeout_secs = n,
            _ => tracing::warn!(
                "Ignoring invalid UPSTREAM_TIMEOUT_SECS={}, keeping {}s",
                raw,
                self.upstream_timeout_secs
            ),
        }
    }

    /// Get upstream timeout as Duration
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
