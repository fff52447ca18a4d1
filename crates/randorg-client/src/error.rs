//! Error types for client operations.
//!
//! Every public operation returns either a typed value or one of the
//! [`RandomError`] variants below. Nothing is retried.

use randorg_proto::{ProtoError, RpcError};
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, RandomError>;

/// Errors that can occur while talking to the random service.
#[derive(Debug, Error)]
pub enum RandomError {
    /// Client configuration is invalid (missing API key, bad proxy URL, ...).
    #[error("configuration error: {message}")]
    Config {
        /// What is wrong with the configuration.
        message: String,
    },

    /// A caller-supplied parameter is out of bounds. Raised before any request.
    #[error("invalid parameter '{parameter}': {reason}")]
    Validation {
        /// The parameter name.
        parameter: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Network or connection failure.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("format error: {reason}")]
    Format {
        /// What was wrong.
        reason: String,
        /// Raw response body, when one was received.
        payload: Option<String>,
    },

    /// The service answered with an error object.
    #[error("API Error Code {code}: {message:?}.")]
    Api {
        /// Service error code, verbatim.
        code: i64,
        /// Service error message, verbatim.
        message: String,
    },

    /// A returned data element did not have the expected type.
    #[error("type mismatch at index {index}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Position in the data array.
        index: usize,
        /// Expected element type.
        expected: &'static str,
        /// The offending value as JSON.
        found: String,
    },

    /// The request could not be serialized.
    #[error("encoding error: {message}")]
    Encoding {
        /// Serializer message.
        message: String,
    },
}

impl RandomError {
    /// Creates a `Config` error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a `Validation` error.
    #[must_use]
    pub fn validation(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a `Format` error without a payload.
    #[must_use]
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
            payload: None,
        }
    }

    /// Returns the service error code for `Api` errors.
    #[must_use]
    pub const fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<ProtoError> for RandomError {
    fn from(err: ProtoError) -> Self {
        match err {
            ProtoError::Encoding(message) => Self::Encoding { message },
            ProtoError::Format { reason, payload } => Self::Format {
                reason,
                payload: Some(payload),
            },
            ProtoError::MissingRandomData => {
                Self::format("result has no random data block")
            }
            err @ ProtoError::InvalidTimestamp { .. } => Self::format(err.to_string()),
        }
    }
}

impl From<RpcError> for RandomError {
    fn from(err: RpcError) -> Self {
        Self::Api {
            code: err.code,
            message: err.message,
        }
    }
}

impl From<reqwest::Error> for RandomError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(format!("request timed out: {err}"))
        } else if err.is_builder() {
            Self::config(format!("invalid HTTP client setup: {err}"))
        } else {
            Self::transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_keeps_message_verbatim() {
        let err = RandomError::Api {
            code: 202,
            message: "Invalid API key.".into(),
        };
        assert_eq!(err.to_string(), "API Error Code 202: \"Invalid API key.\".");
        assert_eq!(err.api_code(), Some(202));
    }

    #[test]
    fn validation_display() {
        let err = RandomError::validation("n", "must be in [1, 10000], got 0");
        assert_eq!(err.to_string(), "invalid parameter 'n': must be in [1, 10000], got 0");
    }

    #[test]
    fn from_rpc_error() {
        let err = RandomError::from(RpcError {
            code: 402,
            message: "quota exceeded".into(),
            data: None,
        });
        assert_eq!(err.api_code(), Some(402));
        assert_eq!(err.to_string(), "API Error Code 402: \"quota exceeded\".");
    }

    #[test]
    fn from_proto_format_keeps_payload() {
        let err = RandomError::from(ProtoError::format("bad", b"<html>"));
        match err {
            RandomError::Format { payload, .. } => assert_eq!(payload.as_deref(), Some("<html>")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_proto_missing_random_data() {
        let err = RandomError::from(ProtoError::MissingRandomData);
        assert!(matches!(err, RandomError::Format { payload: None, .. }));
    }

    #[test]
    fn from_proto_encoding() {
        let err = RandomError::from(ProtoError::Encoding("nope".into()));
        assert!(matches!(err, RandomError::Encoding { .. }));
    }

    #[test]
    fn type_mismatch_display() {
        let err = RandomError::TypeMismatch {
            index: 3,
            expected: "integer",
            found: "\"abc\"".into(),
        };
        assert_eq!(err.to_string(), "type mismatch at index 3: expected integer, found \"abc\"");
    }
}
