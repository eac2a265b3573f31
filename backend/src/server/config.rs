//! Startup configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const STORE_URL: &str = "STORE_URL";
const STORE_ANON_KEY: &str = "STORE_ANON_KEY";
const BIND_ADDR: &str = "BIND_ADDR";
const STORE_TIMEOUT_SECS: &str = "STORE_TIMEOUT_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

/// Configuration failures; all fatal before the server binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    /// An environment variable is set but unusable.
    #[error("invalid value for {name}: {message}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Parse failure description.
        message: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listener address.
    pub bind_addr: SocketAddr,
    /// Base URL of the hosted store.
    pub store_url: Url,
    /// Public key sent with every store request.
    pub store_anon_key: String,
    /// Per-request timeout on store calls.
    pub store_timeout: Duration,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Fails when `STORE_URL` or `STORE_ANON_KEY` is absent, or when
    /// any variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let store_url = Url::parse(&required(STORE_URL)?).map_err(|e| ConfigError::InvalidVar {
            name: STORE_URL,
            message: e.to_string(),
        })?;
        let store_anon_key = required(STORE_ANON_KEY)?;

        let bind_addr = lookup(BIND_ADDR)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidVar {
                name: BIND_ADDR,
                message: e.to_string(),
            })?;
        let store_timeout = match lookup(STORE_TIMEOUT_SECS).filter(|value| !value.is_empty()) {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidVar {
                        name: STORE_TIMEOUT_SECS,
                        message: e.to_string(),
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        };

        Ok(Self {
            bind_addr,
            store_url,
            store_anon_key,
            store_timeout,
        })
    }
}
