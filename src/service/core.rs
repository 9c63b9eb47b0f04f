//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tower_service::Service;
use tracing::debug;

use crate::{
    codec::Codec,
    protocol::error::A2AError,
    service::{A2ARequest, A2AResponse},
    transport::{Transport, TransportRequest},
};

/// Core A2A protocol service that wraps a transport
///
/// This service implements the Tower `Service` trait and executes task operations:
/// `tasks/send` and `tasks/get` resolve to a [`A2AResponse::Task`], while
/// `tasks/sendSubscribe` resolves to an [`A2AResponse::Stream`].
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    /// * `codec` - The codec for serialization/deserialization
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self { transport, codec }
    }

    /// Build a transport request from an A2A request
    fn build_transport_request(
        req: &A2ARequest,
        codec: &dyn Codec,
    ) -> Result<TransportRequest, A2AError> {
        let mut transport_req = TransportRequest::new()
            .header("Content-Type", codec.content_type())
            .timeout(req.context.timeout);

        // The transport negotiates the event-stream type for subscriptions
        if !req.operation.is_streaming() {
            transport_req = transport_req.header("Accept", codec.content_type());
        }

        for (key, value) in &req.context.headers {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        let body = codec.encode_request(&req.operation)?;
        Ok(transport_req.body(body))
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();

        Box::pin(async move {
            let transport_req = Self::build_transport_request(&req, codec.as_ref())?;
            debug!(
                method = req.operation.method(),
                task_id = req.operation.task_id(),
                "dispatching task operation"
            );

            if req.operation.is_streaming() {
                let stream = transport.subscribe(transport_req).await?;
                return Ok(A2AResponse::Stream(stream));
            }

            let body = transport.post_json(transport_req).await?;
            codec.decode_response(body, &req.operation)
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::StreamExt;
    use serde_json::{json, Value};

    use crate::{
        codec::{JsonRpcCodec, StreamEvent},
        protocol::operation::TaskOperation,
        service::RequestContext,
        transport::{mock::MockTransport, TransportResponse},
    };

    use super::*;

    fn task_response(id: &str) -> TransportResponse {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "result": {"id": id, "status": {"state": "completed"}}
        });
        TransportResponse::new(200).body(Bytes::from(serde_json::to_vec(&body).unwrap()))
    }

    #[tokio::test]
    async fn test_service_send_task() {
        let transport = MockTransport::new(|_req| task_response("task-123"));
        let mut service = A2AProtocolService::new(transport.clone(), Arc::new(JsonRpcCodec));

        let request = A2ARequest::new(
            TaskOperation::send("task-123", "s1", "Hello"),
            RequestContext::default().with_header("Authorization", "Bearer abc"),
        );

        let task = service.call(request).await.unwrap().into_task().unwrap();
        assert_eq!(task.id, "task-123");

        let sent = &transport.requests()[0];
        assert_eq!(sent.headers["Content-Type"], "application/json");
        assert_eq!(sent.headers["Authorization"], "Bearer abc");
        assert_eq!(sent.timeout, Some(std::time::Duration::from_secs(30)));

        let body: Value = serde_json::from_slice(&sent.body).unwrap();
        assert_eq!(body["method"], "tasks/send");
    }

    #[tokio::test]
    async fn test_service_http_error() {
        let transport = MockTransport::new(|_req| {
            TransportResponse::new(401).body(Bytes::from_static(b"Unauthorized"))
        });
        let mut service = A2AProtocolService::new(transport, Arc::new(JsonRpcCodec));

        let request = A2ARequest::new(TaskOperation::get("task-123"), RequestContext::default());

        match service.call(request).await {
            Err(A2AError::Http { status_code, body }) => {
                assert_eq!(status_code, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("Expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_service_subscribe_returns_stream() {
        let transport = MockTransport::ok()
            .with_events(|_req| Ok(vec![StreamEvent::message("{}"), StreamEvent::close()]));
        let mut service = A2AProtocolService::new(transport.clone(), Arc::new(JsonRpcCodec));

        let request = A2ARequest::new(
            TaskOperation::send_subscribe("t1", "s1", "Hello"),
            RequestContext::new(None),
        );

        let stream = service.call(request).await.unwrap().into_stream().unwrap();
        let events: Vec<_> = stream.collect().await;
        assert_eq!(events.len(), 2);

        let sent = &transport.requests()[0];
        assert!(!sent.headers.contains_key("Accept"));
        assert_eq!(sent.timeout, None);
    }
}
