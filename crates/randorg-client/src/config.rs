//! Client configuration.
//!
//! Build a [`ClientConfig`] in code or load it with [`ClientConfig::from_env`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RandomError, Result};

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.random.org/json-rpc/1/invoke";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "RANDOM_ORG_API_KEY";
/// Environment variable overriding the endpoint.
pub const ENV_ENDPOINT: &str = "RANDOM_ORG_ENDPOINT";
/// Environment variable holding a proxy URL (empty string means direct).
pub const ENV_PROXY: &str = "RANDOM_ORG_PROXY";
/// Environment variable holding the timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "RANDOM_ORG_TIMEOUT_SECS";

/// How outgoing requests are routed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxySetting {
    /// Use the system proxy settings (`HTTPS_PROXY`, ...).
    #[default]
    System,
    /// Connect directly, ignoring system proxies.
    Direct,
    /// Route through the given proxy URL.
    Url(String),
}

impl ProxySetting {
    /// Maps an address string to a setting; an empty string means direct.
    #[must_use]
    pub fn from_address(address: &str) -> Self {
        let address = address.trim();
        if address.is_empty() {
            Self::Direct
        } else {
            Self::Url(address.to_string())
        }
    }
}

/// Configuration for a [`RandomClient`](crate::RandomClient).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// JSON-RPC endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Proxy routing.
    #[serde(default)]
    pub proxy: ProxySetting,
    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: default_endpoint(),
            proxy: ProxySetting::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Loads the configuration from `RANDOM_ORG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the API key is missing or a value is
    /// malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the API key is missing or a value is
    /// malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .ok_or_else(|| RandomError::config(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(api_key);

        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(proxy) = lookup(ENV_PROXY) {
            config.proxy = ProxySetting::from_address(&proxy);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                RandomError::config(format!("{ENV_TIMEOUT_SECS} must be whole seconds: {e}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the proxy routing.
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxySetting) -> Self {
        self.proxy = proxy;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` for an empty API key or endpoint, or a
    /// zero timeout.
    pub fn validate(&self) -> Result<()> {
        validate_api_key(&self.api_key)?;
        if self.endpoint.trim().is_empty() {
            return Err(RandomError::config("endpoint cannot be empty"));
        }
        if self.timeout.is_zero() {
            return Err(RandomError::config("timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// Rejects an empty or whitespace-only API key.
///
/// # Errors
///
/// Returns `RandomError::Config` if the key is blank.
pub fn validate_api_key(api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(RandomError::config("provide an api key"));
    }
    Ok(())
}
