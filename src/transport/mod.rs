//! Transport abstraction layer for A2A protocol

pub mod blocking;
pub mod http;
#[cfg(test)]
pub mod mock;

use std::{
    collections::HashMap,
    task::{Context, Poll},
    time::Duration,
};

pub use blocking::{BlockingEventStream, BlockingTransport};
pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{codec::EventStream, protocol::error::A2AError};

/// Transport request posted to the agent endpoint
#[derive(Debug, Clone, Default)]
pub struct TransportRequest {
    /// Headers for the request
    pub headers: HashMap<String, String>,

    /// Request body as bytes
    pub body: Bytes,

    /// Deadline for the whole exchange; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// Create an empty transport request
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header to the request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Transport response
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body as bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the response
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the response body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Check if the response indicates success (2xx status code)
    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Check if the response indicates an error (status code 400 or above)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Core transport trait for posting JSON-RPC payloads to an agent
///
/// Implementations post every request to the single endpoint returned by
/// [`Transport::base_url`]. Each call owns its connection for the duration of the
/// exchange.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Check if the transport is ready to accept requests
    ///
    /// This is used by Tower's Service trait to implement backpressure
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), A2AError>>;

    /// Execute a request/response exchange
    ///
    /// Connection failures map to [`A2AError::Communication`], or
    /// [`A2AError::Timeout`] when the deadline passes.
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError>;

    /// Open an SSE subscription
    ///
    /// Failures while opening or reading the stream map to [`A2AError::Stream`].
    async fn subscribe(&self, request: TransportRequest) -> Result<EventStream, A2AError>;

    /// Get the endpoint URL for this transport
    fn base_url(&self) -> &Url;

    /// Post a request and decode the JSON response body
    ///
    /// Status codes of 400 and above fail with [`A2AError::Http`]; a body that is
    /// not JSON fails with [`A2AError::Communication`].
    async fn post_json(&self, request: TransportRequest) -> Result<Value, A2AError> {
        let response = self.execute(request).await?;
        debug!(status = response.status, "received agent response");

        if response.is_error() {
            return Err(A2AError::Http {
                status_code: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            A2AError::Communication(format!("Failed to decode JSON response: {}", e))
        })
    }
}
