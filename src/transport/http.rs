//! HTTP transport implementation for A2A protocol

use std::task::{Context, Poll};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};
use url::Url;

use crate::{
    codec::{EventStream, SseCodec},
    protocol::error::A2AError,
};

use super::{Transport, TransportRequest, TransportResponse};

const EVENT_STREAM: &str = "text/event-stream";

/// HTTP transport implementation using reqwest
///
/// All requests are POSTed to the configured endpoint. Idle connections are not
/// pooled, so every call opens its own connection and releases it when the
/// response (or stream) is dropped.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    ///
    /// * `base_url` - The agent's JSON-RPC endpoint (e.g., "<https://agent.example.com/a2a>")
    pub fn new(base_url: Url) -> Result<Self, A2AError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| A2AError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Create a new HTTP transport with a custom reqwest client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { client, base_url }
    }

    fn request_builder(&self, request: TransportRequest) -> reqwest::RequestBuilder {
        let mut req_builder = self.client.post(self.base_url.clone());

        for (key, value) in request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        req_builder.body(request.body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        // HTTP client is always ready
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        debug!(url = %self.base_url, "posting JSON-RPC request");
        let response = self.request_builder(request).send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    async fn subscribe(&self, request: TransportRequest) -> Result<EventStream, A2AError> {
        debug!(url = %self.base_url, "opening SSE subscription");
        let response = self
            .request_builder(request)
            .header(ACCEPT, EVENT_STREAM)
            .send()
            .await
            .map_err(|e| A2AError::stream("SSE connection error", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "SSE subscription rejected");
            return Err(A2AError::stream_msg(format!(
                "SSE subscription failed with HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with(EVENT_STREAM) {
            return Err(A2AError::stream_msg(format!(
                "Expected {} response, got '{}'",
                EVENT_STREAM, content_type
            )));
        }

        Ok(SseCodec::new().parse_stream(response.bytes_stream()))
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}
