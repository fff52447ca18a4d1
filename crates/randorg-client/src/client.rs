//! The random service client and its request pipeline.
//!
//! Every call goes through [`RandomClient::request_command`]: encode the
//! envelope, POST it, decode the response, fold any usage fields into the
//! [`UsageCache`], then hand back `random.data`.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use randorg_proto::{Method, ProtoError, RpcRequest, RpcResult, UsageParams, decode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::{ClientConfig, ProxySetting, validate_api_key};
use crate::error::{RandomError, Result};
use crate::transport::{HttpTransport, Transport};
use crate::usage::{UsageCache, UsageSnapshot};

/// Per-call accounting reported with the last successful result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallStats {
    /// Random bits consumed by the call.
    pub bits_used: Option<u64>,
    /// How long the service asks the client to wait before the next call.
    pub advisory_delay: Option<Duration>,
}

impl CallStats {
    fn from_result(result: &RpcResult) -> Self {
        Self {
            bits_used: result.bits_used,
            advisory_delay: result.advisory_delay.map(Duration::from_millis),
        }
    }
}

/// Client for the true-random JSON-RPC service.
///
/// All methods take `&self`; share the client in an `Arc` to use it from
/// several tasks.
pub struct RandomClient<T = HttpTransport> {
    api_key: String,
    transport: T,
    usage: UsageCache,
    last_call: Mutex<Option<CallStats>>,
}

impl<T: fmt::Debug> fmt::Debug for RandomClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomClient")
            .field("transport", &self.transport)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

impl RandomClient<HttpTransport> {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the API key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&ClientConfig::new(api_key))
    }

    /// Creates a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the configuration is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::from_config(config)?;
        Self::with_transport(config.api_key.clone(), transport)
    }

    /// Creates a client from `RANDOM_ORG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the variables are missing or invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Routes further requests through `proxy`.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the proxy URL is invalid.
    pub fn set_proxy(&mut self, proxy: ProxySetting) -> Result<()> {
        self.transport.set_proxy(proxy)
    }

    /// Routes further requests through the proxy at `address`. An empty
    /// address disables proxying altogether.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the address is not a valid URL.
    pub fn set_proxy_address(&mut self, address: &str) -> Result<()> {
        self.set_proxy(ProxySetting::from_address(address))
    }
}

impl<T: Transport> RandomClient<T> {
    /// Creates a client on top of a custom transport.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::Config` if the API key is blank.
    pub fn with_transport(api_key: impl Into<String>, transport: T) -> Result<Self> {
        let api_key = api_key.into();
        validate_api_key(&api_key)?;
        Ok(Self {
            api_key,
            transport,
            usage: UsageCache::new(),
            last_call: Mutex::new(None),
        })
    }

    /// Returns the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the usage cache.
    pub const fn usage_cache(&self) -> &UsageCache {
        &self.usage
    }

    /// Returns the accounting of the last successful call.
    pub fn last_call(&self) -> Option<CallStats> {
        *self.last_call.lock()
    }

    /// Sends `method` with `params` and returns the raw `random.data` array.
    ///
    /// Usage fields in the result are merged into the cache before the data
    /// is extracted.
    ///
    /// # Errors
    ///
    /// - `Encoding` if the params cannot be serialized
    /// - `Transport` on network failure
    /// - `Api` if the service returned an error object
    /// - `Format` if the response is malformed or has no `random.data`
    pub async fn request_command<P>(&self, method: &str, params: &P) -> Result<Vec<Value>>
    where
        P: Serialize + Sync + ?Sized,
    {
        let block = self.invoke(method, params).await?.into_random_block()?;
        trace!(
            method,
            completion_time = block.completion_time.as_deref(),
            "random data received"
        );
        Ok(block.data)
    }

    /// Sends one request and returns the decoded success result.
    async fn invoke<P>(&self, method: &str, params: &P) -> Result<RpcResult>
    where
        P: Serialize + Sync + ?Sized,
    {
        let request = RpcRequest::new(method, params, &self.api_key)?;
        let body = request.to_bytes()?;
        debug!(method, id = %request.id, "sending request");

        let response = self.transport.post(body).await?;
        trace!(method, len = response.len(), "decoding response");

        let result = decode(&response)?.into_result().map_err(|error| {
            warn!(
                method,
                code = error.code,
                message = %error.message,
                "service returned an error"
            );
            RandomError::from(error)
        })?;
        self.usage.merge(&result.usage);
        *self.last_call.lock() = Some(CallStats::from_result(&result));
        Ok(result)
    }

    /// Queries the service for the key's usage and returns the merged
    /// snapshot, which may still be incomplete.
    ///
    /// # Errors
    ///
    /// Propagates transport, API and format errors, except the missing
    /// `random` block a usage result never carries.
    pub async fn get_usage(&self) -> Result<UsageSnapshot> {
        let result = self.invoke(Method::GetUsage.as_str(), &UsageParams {}).await?;
        match result.into_data() {
            Ok(_) | Err(ProtoError::MissingRandomData) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(self.usage.current().unwrap_or_default())
    }

    /// Returns the cached usage if it is complete, otherwise queries it.
    ///
    /// # Errors
    ///
    /// Same as [`get_usage`](Self::get_usage).
    pub async fn usage(&self) -> Result<UsageSnapshot> {
        if let Some(snapshot) = self.usage.snapshot() {
            return Ok(snapshot);
        }
        self.get_usage().await
    }

    /// Returns the cached usage snapshot if it is complete. Never sends a request.
    pub fn cached_usage(&self) -> Option<UsageSnapshot> {
        self.usage.snapshot()
    }
}
