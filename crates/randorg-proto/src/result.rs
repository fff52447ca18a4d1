//! Typed contents of a successful `result` object.
//!
//! Every result may piggyback API-key usage fields next to the `random`
//! block, so [`RpcResult`] flattens a [`UsageReport`] into itself.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{ProtoError, Result};

/// Status of an API key as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    /// Key is stopped.
    Stopped,
    /// Key is paused.
    Paused,
    /// Key is running and can serve requests.
    Running,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Paused => write!(f, "paused"),
            Self::Running => write!(f, "running"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Usage fields that may appear in any result object.
///
/// These fields are a side channel: a value of the wrong type is logged and
/// read as absent rather than failing the whole result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    /// Key status.
    #[serde(
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<KeyStatus>,
    /// Key creation time, as sent (`2013-02-20 17:53:40Z`).
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_time: Option<String>,
    /// Estimated remaining random bits.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub bits_left: Option<i64>,
    /// Estimated remaining requests.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub requests_left: Option<i64>,
    /// Bits used since the key was created.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_bits: Option<i64>,
    /// Requests made since the key was created.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_requests: Option<i64>,
}

impl UsageReport {
    /// Returns true if no usage field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.creation_time.is_none()
            && self.bits_left.is_none()
            && self.requests_left.is_none()
            && self.total_bits.is_none()
            && self.total_requests.is_none()
    }
}

/// The `random` block of a generation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomBlock {
    /// Generated values, in service order.
    pub data: Vec<Value>,
    /// When the service completed the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<String>,
}

/// A successful `result` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcResult {
    /// The `random` block, left untyped until extraction so that usage
    /// fields survive a malformed block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random: Option<Value>,

    /// Usage side channel.
    #[serde(flatten)]
    pub usage: UsageReport,

    /// Bits consumed by this call.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub bits_used: Option<u64>,

    /// Milliseconds the service asks the client to wait before the next call.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub advisory_delay: Option<u64>,
}

impl RpcResult {
    /// Consumes the result and returns the typed `random` block.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::MissingRandomData`] if `random` is absent or
    /// does not contain a `data` array.
    pub fn into_random_block(self) -> Result<RandomBlock> {
        let random = self.random.ok_or(ProtoError::MissingRandomData)?;
        serde_json::from_value(random).map_err(|_| ProtoError::MissingRandomData)
    }

    /// Consumes the result and returns `random.data`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::MissingRandomData`] if the block is absent or malformed.
    pub fn into_data(self) -> Result<Vec<Value>> {
        self.into_random_block().map(|block| block.data)
    }
}

fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<Option<KeyStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(_) => serde_json::from_value(value).ok(),
        other => {
            warn!(value = %other, "ignoring usage status that is not a string");
            None
        }
    })
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => {
            warn!(value = %other, "ignoring usage timestamp that is not a string");
            None
        }
    })
}

/// Reads an integer count, accepting integral floats such as `199984.0`.
fn lenient_count<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let count = value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= 9.0e15)
                .map(|f| f as i64)
        })
        .and_then(|n| T::try_from(n).ok());
    if count.is_none() {
        warn!(value = %value, "ignoring usage count that is not a valid integer");
    }
    Ok(count)
}

/// Parses a service timestamp.
///
/// The service separates date and time with a space instead of `T`; both
/// forms are accepted.
///
/// # Errors
///
/// Returns [`ProtoError::InvalidTimestamp`] if the value is not RFC 3339 after
/// normalisation.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let normalised = value.trim().replacen(' ', "T", 1);
    DateTime::parse_from_rfc3339(&normalised)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ProtoError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
