//! HTTP transport.
//!
//! [`Transport`] moves one encoded request body to the service and returns
//! the raw response body. [`HttpTransport`] is the production implementation
//! on top of a reusable `reqwest::Client`.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, trace};

use crate::config::{ClientConfig, ProxySetting};
use crate::error::{RandomError, Result};

/// Content type of every request.
pub const CONTENT_TYPE_JSON_RPC: &str = "application/json-rpc";

/// Accept header of every request.
pub const ACCEPT_JSON: &str = "application/json";

/// Moves encoded requests to the service.
///
/// Implementations must not retry: every failure is surfaced to the caller.
pub trait Transport: Send + Sync + fmt::Debug {
    /// POSTs `body` and returns the full response body.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Transport` on connection failure or an
    /// unreadable body.
    fn post(&self, body: Vec<u8>) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// HTTPS transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    proxy: ProxySetting,
}

impl HttpTransport {
    /// Builds a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the proxy URL is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = build_client(config.timeout, &config.proxy)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
            proxy: config.proxy.clone(),
        })
    }

    /// Replaces the proxy routing, rebuilding the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the proxy URL is invalid. The
    /// previous client is kept in that case.
    pub fn set_proxy(&mut self, proxy: ProxySetting) -> Result<()> {
        self.client = build_client(self.timeout, &proxy)?;
        debug!(proxy = ?proxy, "proxy updated");
        self.proxy = proxy;
        Ok(())
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the current proxy routing.
    #[must_use]
    pub const fn proxy(&self) -> &ProxySetting {
        &self.proxy
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn build_client(timeout: Duration, proxy: &ProxySetting) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(timeout);
    builder = match proxy {
        ProxySetting::System => builder,
        ProxySetting::Direct => builder.no_proxy(),
        ProxySetting::Url(url) => {
            let proxy = reqwest::Proxy::all(url.as_str())
                .map_err(|e| RandomError::config(format!("invalid proxy url '{url}': {e}")))?;
            builder.proxy(proxy)
        }
    };
    builder
        .build()
        .map_err(|e| RandomError::config(format!("failed to build HTTP client: {e}")))
}

impl Transport for HttpTransport {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON_RPC)
            .header(ACCEPT, ACCEPT_JSON)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            RandomError::transport(format!("failed to read response body: {e}"))
        })?;
        trace!(status = status.as_u16(), len = bytes.len(), "response received");

        // Error envelopes may come with a non-2xx status, so the body is
        // always handed to the codec.
        if !status.is_success() {
            debug!(status = status.as_u16(), "non-success HTTP status");
        }
        Ok(bytes.to_vec())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_keeps_settings() {
        let config = ClientConfig::new("key")
            .with_endpoint("http://127.0.0.1:1/invoke")
            .with_proxy(ProxySetting::Direct)
            .with_timeout(Duration::from_secs(3));
        let transport = HttpTransport::from_config(&config).expect("transport");
        assert_eq!(transport.endpoint(), "http://127.0.0.1:1/invoke");
        assert_eq!(transport.proxy(), &ProxySetting::Direct);
        assert_eq!(transport.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn proxy_url_accepted() {
        let config = ClientConfig::new("key")
            .with_proxy(ProxySetting::Url("http://proxy.internal:3128".into()));
        assert!(HttpTransport::from_config(&config).is_ok());
    }

    #[test]
    fn invalid_proxy_rejected_and_previous_kept() {
        let mut transport =
            HttpTransport::from_config(&ClientConfig::new("key")).expect("transport");
        let err = transport
            .set_proxy(ProxySetting::Url("http://[::1".into()))
            .expect_err("should fail");
        assert!(matches!(err, RandomError::Config { .. }));
        assert_eq!(transport.proxy(), &ProxySetting::System);
    }

    #[test]
    fn set_proxy_updates_setting() {
        let mut transport =
            HttpTransport::from_config(&ClientConfig::new("key")).expect("transport");
        transport
            .set_proxy(ProxySetting::Url("http://10.0.0.1:8080".into()))
            .expect("set proxy");
        assert_eq!(
            transport.proxy(),
            &ProxySetting::Url("http://10.0.0.1:8080".into())
        );
    }
}
