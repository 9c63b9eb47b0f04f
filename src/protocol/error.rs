//! Error types for A2A task delegation

use serde_json::Value;
use thiserror::Error;

/// Boxed error used as the source of stream failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for A2A task delegation
#[derive(Debug, Error)]
pub enum A2AError {
    /// Missing or invalid client configuration (endpoint URL, signing secret)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-2xx HTTP response on a request/response call
    #[error("HTTP error {status_code}: {body}")]
    Http {
        /// HTTP status code returned by the agent
        status_code: u16,

        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Connection failure or undecodable body on a request/response call
    #[error("Communication error: {0}")]
    Communication(String),

    /// Failure while opening or consuming an SSE subscription
    #[error("Stream error: {message}")]
    Stream {
        /// Human-readable description
        message: String,

        /// The underlying cause, if any
        #[source]
        source: Option<BoxError>,
    },

    /// JSON-RPC error object returned by the agent
    #[error("JSON-RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,

        /// JSON-RPC error message
        message: String,

        /// Optional error payload
        data: Option<Value>,
    },

    /// Protocol-level error (malformed envelope, unexpected response kind)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Outbound request violates a protocol invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// Content that cannot be converted (e.g. file parts)
    #[error("Not supported: {0}")]
    Unsupported(String),

    /// Token signing or verification error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request timeout error
    #[error("Request timeout")]
    Timeout,

    /// The language model capability failed
    #[error("Model error: {0}")]
    Model(String),

    /// A delegated task could not be completed
    #[error("Delegation error: {0}")]
    Delegation(String),
}

impl A2AError {
    /// Create a stream error wrapping an underlying cause
    pub fn stream(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        A2AError::Stream {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a stream error without an underlying cause
    pub fn stream_msg(message: impl Into<String>) -> Self {
        A2AError::Stream {
            message: message.into(),
            source: None,
        }
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else {
            A2AError::Communication(format!("Request failed: {}", err))
        }
    }
}

impl From<jsonwebtoken::errors::Error> for A2AError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        A2AError::Auth(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = A2AError::Http {
            status_code: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP error 503: unavailable");
    }

    #[test]
    fn test_stream_error_keeps_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = A2AError::stream("SSE connection error", cause);

        assert!(err.to_string().contains("SSE connection error"));
        assert_eq!(err.source().unwrap().to_string(), "reset by peer");
        assert!(A2AError::stream_msg("closed").source().is_none());
    }
}
