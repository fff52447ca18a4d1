//! Client for a Random.org-style true-random JSON-RPC service.
//!
//! The client sends one JSON-RPC request per call, surfaces service errors
//! verbatim and caches the API-key usage figures that ride along on every
//! response.
//!
//! # Features
//!
//! - Typed generators for integers, decimal fractions, Gaussians, strings,
//!   UUIDs and blobs, with local parameter validation
//! - Usage cache merged from every response, refreshed on demand
//! - Pluggable [`Transport`]; the default [`HttpTransport`] uses `reqwest`
//!   with optional proxy routing
//!
//! # Example
//!
//! ```rust,no_run
//! use randorg_client::{ClientConfig, RandomClient};
//!
//! # async fn example() -> randorg_client::Result<()> {
//! let config = ClientConfig::new("00000000-0000-0000-0000-000000000000");
//! let client = RandomClient::from_config(&config)?;
//!
//! let dice = client.generate_integers(2, 1, 6).await?;
//! println!("rolled {dice:?}");
//!
//! let usage = client.usage().await?;
//! println!("bits left: {:?}", usage.bits_left);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod generators;
pub mod transport;
pub mod usage;
pub mod validation;

pub use client::{CallStats, RandomClient};
pub use config::{ClientConfig, ProxySetting};
pub use error::{RandomError, Result};
pub use generators::{FromRandomValue, coerce};
pub use randorg_proto::KeyStatus;
pub use transport::{HttpTransport, Transport};
pub use usage::{UsageCache, UsageSnapshot};
