//! Server configuration.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Listener and timeout settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on
    pub api_host: SocketAddr,
    /// Deadline for handling one request, including writing the response
    pub request_timeout: Duration,
    /// How long to wait for in-flight requests after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    pub const DEFAULT_API_HOST: &'static str = ":8080";

    pub fn with_api_host(mut self, addr: SocketAddr) -> Self {
        self.api_host = addr;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Parse a listen address. A bare `:port` binds every interface.
pub fn parse_listen_addr(raw: &str) -> anyhow::Result<SocketAddr> {
    let raw = raw.trim();
    let full = if raw.starts_with(':') {
        format!("0.0.0.0{}", raw)
    } else {
        raw.to_string()
    };
    full.parse()
        .with_context(|| format!("invalid listen address {:?}", raw))
}

/// Load index configuration from a `.toml` or JSON file.
pub fn load_index_config(path: &Path) -> anyhow::Result<heatmap::Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => heatmap::Config::from_toml(&text)?,
        _ => heatmap::Config::from_json(&text)?,
    };
    Ok(config)
}
