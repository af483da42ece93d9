//! Server configuration.

use core::net::SocketAddr;
use core::time::Duration;

use clap::Parser;

/// Command-line and environment configuration of `suggestion-server`.
#[derive(Clone, Debug, Parser)]
#[command(name = "suggestion-server", version, about = "Hyperparameter suggestion service")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "SUGGESTION_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "SUGGESTION_PORT", default_value_t = 6789)]
    pub port: u16,

    /// Upper bound on the time spent on one request, in seconds.
    #[arg(long, env = "SUGGESTION_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    /// Longest accepted request line, in bytes.
    #[arg(long, env = "SUGGESTION_MAX_REQUEST_BYTES", default_value_t = 4 * 1024 * 1024)]
    pub max_request_bytes: usize,
}

impl ServerConfig {
    /// The `host:port` pair to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        match self.host.parse::<core::net::IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, self.port).to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }

    /// The per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 6789,
            request_timeout_secs: 60,
            max_request_bytes: 4 * 1024 * 1024,
        }
    }
}
