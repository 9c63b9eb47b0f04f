use std::{
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use async_trait::async_trait;
use url::Url;

use crate::{
    codec::{EventStream, StreamEvent},
    protocol::error::A2AError,
    transport::{Transport, TransportRequest, TransportResponse},
};

type Handler = Arc<dyn Fn(TransportRequest) -> TransportResponse + Send + Sync>;
type EventHandler =
    Arc<dyn Fn(TransportRequest) -> Result<Vec<StreamEvent>, A2AError> + Send + Sync>;

/// Mock transport for internal testing
///
/// Answers request/response calls with `handler`, subscriptions with the events
/// produced by the event handler, and records every request it receives.
#[derive(Clone)]
pub(crate) struct MockTransport {
    handler: Handler,
    events: EventHandler,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    base_url: Url,
}

impl MockTransport {
    /// Create a new mock transport with a custom request handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            events: Arc::new(|_| Ok(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            base_url: Url::parse("mock://agent").unwrap(),
        }
    }

    /// Create a mock transport that always returns 200 OK
    pub fn ok() -> Self {
        Self::new(|_| TransportResponse::new(200))
    }

    /// Answer subscriptions with the events produced by `events`
    pub fn with_events<F>(mut self, events: F) -> Self
    where
        F: Fn(TransportRequest) -> Result<Vec<StreamEvent>, A2AError> + Send + Sync + 'static,
    {
        self.events = Arc::new(events);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: &TransportRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        self.record(&request);
        Ok((self.handler)(request))
    }

    async fn subscribe(&self, request: TransportRequest) -> Result<EventStream, A2AError> {
        self.record(&request);
        let events = (self.events)(request)?;
        let stream: EventStream =
            Box::pin(futures::stream::iter(events.into_iter().map(Ok::<_, A2AError>)));
        Ok(stream)
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport").finish()
    }
}
