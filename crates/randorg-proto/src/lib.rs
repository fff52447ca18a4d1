//! # randorg-proto
//!
//! Wire definitions for the true-random JSON-RPC service.
//!
//! The service speaks exactly one request shape (method + named params +
//! string id) and one response shape (`result` or `error`). This crate holds
//! the typed envelopes and the codec; it performs no I/O.
//!
//! # Example
//!
//! ```
//! use randorg_proto::{decode, encode, Method, RpcResponse, UuidParams};
//!
//! let bytes = encode(Method::GenerateUuids.as_str(), &UuidParams { n: 1 }, "my-key")?;
//! assert!(!bytes.is_empty());
//!
//! let response = decode(br#"{"jsonrpc":"2.0","result":{"random":{"data":["x"]}},"id":"1"}"#)?;
//! assert!(matches!(response, RpcResponse::Success(_)));
//! # Ok::<(), randorg_proto::ProtoError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod error;
pub mod params;
pub mod result;

pub use envelope::{JSONRPC_VERSION, RpcError, RpcRequest, RpcResponse, decode, encode};
pub use error::{ProtoError, Result};
pub use params::{
    BlobParams, DecimalFractionParams, GaussianParams, IntegerParams, Method, StringParams,
    UsageParams, UuidParams,
};
pub use result::{KeyStatus, RandomBlock, RpcResult, UsageReport, parse_timestamp};
