//! Error types for the randorg-proto crate.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtoError>;

/// Errors that can occur while encoding requests or decoding responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    /// Failed to serialize a request.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The response matched neither the success nor the error envelope.
    #[error("format error: {reason}")]
    Format {
        /// What was wrong with the payload.
        reason: String,
        /// The raw response body, kept for diagnostics.
        payload: String,
    },

    /// A success result did not carry a `random.data` array.
    #[error("format error: result has no random data block")]
    MissingRandomData,

    /// A timestamp field could not be parsed.
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// The raw value received.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl ProtoError {
    /// Creates a `Format` error, keeping the raw payload lossily decoded as UTF-8.
    #[must_use]
    pub fn format(reason: impl Into<String>, payload: &[u8]) -> Self {
        Self::Format {
            reason: reason.into(),
            payload: String::from_utf8_lossy(payload).into_owned(),
        }
    }
}
