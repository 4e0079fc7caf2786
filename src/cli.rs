//! Command-line interface parsing for btcwatch
//!
//! This module handles parsing of CLI arguments using clap. Every flag can also
//! be set from the environment (or a `.env` file), which is how the server is
//! usually configured in deployment.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::upstream::API_NINJAS_BITCOIN_URL;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache TTL was zero
    #[error("Invalid TTL: {0}. The cache TTL must be at least 1 second")]
    InvalidTtl(u64),

    /// The upstream timeout was zero
    #[error("Invalid timeout: {0}. The upstream timeout must be at least 1 second")]
    InvalidTimeout(u64),

    /// The upstream URL is not an http(s) URL
    #[error("Invalid API URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidUrl(String),
}

/// btcwatch - Bitcoin price proxy with a stale-tolerant cache
#[derive(Parser, Debug)]
#[command(name = "btcwatch")]
#[command(about = "Serve Bitcoin price data from a cache that survives upstream outages")]
#[command(version)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BTCWATCH_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, env = "BTCWATCH_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds a fetched price is served before asking upstream again
    #[arg(long, env = "BTCWATCH_TTL_SECS", default_value_t = 10)]
    pub ttl_secs: u64,

    /// Upstream Bitcoin price endpoint
    #[arg(long, env = "BITCOIN_API_URL", default_value = API_NINJAS_BITCOIN_URL)]
    pub api_url: String,

    /// API key sent to the upstream as X-Api-Key
    #[arg(long, env = "BITCOIN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seconds before an upstream request is abandoned
    #[arg(long, env = "BTCWATCH_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

/// Validated server configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a cached price stays fresh
    pub ttl: Duration,
    pub api_url: String,
    pub api_key: Option<String>,
    /// Per-request timeout for the upstream client
    pub timeout: Duration,
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` with typed durations
    /// * `Err(CliError)` if a value is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.ttl_secs == 0 {
            return Err(CliError::InvalidTtl(cli.ttl_secs));
        }
        if cli.timeout_secs == 0 {
            return Err(CliError::InvalidTimeout(cli.timeout_secs));
        }
        if !(cli.api_url.starts_with("http://") || cli.api_url.starts_with("https://")) {
            return Err(CliError::InvalidUrl(cli.api_url.clone()));
        }

        Ok(ServerConfig {
            host: cli.host.clone(),
            port: cli.port,
            ttl: Duration::from_secs(cli.ttl_secs),
            api_url: cli.api_url.clone(),
            // An empty key is the same as no key
            api_key: cli.api_key.clone().filter(|key| !key.trim().is_empty()),
            timeout: Duration::from_secs(cli.timeout_secs),
        })
    }

    /// Address string for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::parse_from([
            "btcwatch",
            "--host",
            "127.0.0.1",
            "--port",
            "8081",
            "--ttl-secs",
            "30",
            "--timeout-secs",
            "3",
        ]);
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, 8081);
        assert_eq!(cli.ttl_secs, 30);
        assert_eq!(cli.timeout_secs, 3);
    }

    #[test]
    fn test_cli_short_port_flag() {
        let cli = Cli::parse_from(["btcwatch", "-p", "9000"]);
        assert_eq!(cli.port, 9000);
    }

    #[test]
    fn test_cli_rejects_non_numeric_port() {
        let result = Cli::try_parse_from(["btcwatch", "--port", "http"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_config_from_cli() {
        let cli = Cli::parse_from([
            "btcwatch",
            "--ttl-secs",
            "15",
            "--api-url",
            "http://localhost:9999/btc",
            "--api-key",
            "abc123",
        ]);
        let config = ServerConfig::from_cli(&cli).unwrap();

        assert_eq!(config.ttl, Duration::from_secs(15));
        assert_eq!(config.api_url, "http://localhost:9999/btc");
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_server_config_zero_ttl_is_error() {
        let cli = Cli::parse_from(["btcwatch", "--ttl-secs", "0"]);
        let err = ServerConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CliError::InvalidTtl(0)));
        assert!(err.to_string().contains("Invalid TTL"));
    }

    #[test]
    fn test_server_config_zero_timeout_is_error() {
        let cli = Cli::parse_from(["btcwatch", "--timeout-secs", "0"]);
        assert!(matches!(
            ServerConfig::from_cli(&cli),
            Err(CliError::InvalidTimeout(0))
        ));
    }

    #[test]
    fn test_server_config_rejects_non_http_url() {
        let cli = Cli::parse_from(["btcwatch", "--api-url", "ftp://example.com/btc"]);
        let err = ServerConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("ftp://example.com/btc"));
    }

    #[test]
    fn test_server_config_blank_api_key_is_none() {
        let cli = Cli::parse_from(["btcwatch", "--api-key", "  "]);
        let config = ServerConfig::from_cli(&cli).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_bind_address() {
        let cli = Cli::parse_from(["btcwatch", "--host", "127.0.0.1", "--port", "3005"]);
        let config = ServerConfig::from_cli(&cli).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3005");
    }
}
