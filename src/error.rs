//! Error types for kvwire
//!
//! Provides a unified error type for encoding and decoding.
//!
//! A protocol nil is not an error: decoders report it as `Ok(None)` and the
//! command handle stores it as [`DecodedResult::Nil`](crate::protocol::DecodedResult::Nil).

use std::sync::Arc;

use thiserror::Error;

use crate::reply::ReplyShape;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for kvwire operations
///
/// Cloneable so a filled command handle can hand its error to any number
/// of readers.
#[derive(Debug, Clone, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Stream Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Decode aborted: {0}")]
    Aborted(String),

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    /// The reply did not have the shape the decoder asked for. The reply
    /// that caused it has not been consumed.
    #[error("Unexpected reply shape: expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: ReplyShape,
    },

    #[error("{context}: unexpected key {key:?}")]
    UnrecognizedField { context: &'static str, key: String },

    #[error("Invalid numeric reply {value:?}: {reason}")]
    ScalarParse { value: String, reason: String },

    #[error("Server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Encode Errors
    // -------------------------------------------------------------------------
    #[error("Invalid arguments: {0}")]
    ArgumentShape(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // -------------------------------------------------------------------------
    // Handle Errors
    // -------------------------------------------------------------------------
    #[error("Reply has not been read yet")]
    ReplyPending,

    #[error("Reply was already read for this command")]
    ReplyAlreadyRead,
}

impl From<std::io::Error> for WireError {
    fn from(err: std::io::Error) -> Self {
        WireError::Io(Arc::new(err))
    }
}

impl WireError {
    /// Errors after which the reply stream can no longer be trusted
    pub fn is_stream_fatal(&self) -> bool {
        matches!(
            self,
            WireError::Io(_) | WireError::Protocol(_) | WireError::Aborted(_)
        )
    }

    /// Shape errors leave the offending reply unread
    pub(crate) fn left_unread(&self) -> bool {
        matches!(self, WireError::Shape { .. })
    }

    pub(crate) fn scalar_parse(value: &str, reason: impl ToString) -> Self {
        WireError::ScalarParse {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
