//! Blocking wrappers around an async [`Transport`]
//!
//! The wrappers drive the async transport on a private current-thread runtime,
//! so they must not be called from inside another Tokio runtime.

use std::{fmt, sync::Arc};

use futures::StreamExt;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::{
    codec::{EventStream, StreamEvent},
    protocol::error::A2AError,
};

use super::{Transport, TransportRequest};

/// Build the runtime used by blocking wrappers
pub(crate) fn blocking_runtime() -> Result<Arc<Runtime>, A2AError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map(Arc::new)
        .map_err(|e| A2AError::Configuration(format!("Failed to start runtime: {}", e)))
}

/// Synchronous transport that blocks the calling thread on each call
#[derive(Clone)]
pub struct BlockingTransport<T> {
    inner: T,
    runtime: Arc<Runtime>,
}

impl<T: Transport> BlockingTransport<T> {
    /// Wrap an async transport
    pub fn new(inner: T) -> Result<Self, A2AError> {
        Ok(Self::with_runtime(inner, blocking_runtime()?))
    }

    /// Wrap an async transport, sharing an existing runtime
    pub fn with_runtime(inner: T, runtime: Arc<Runtime>) -> Self {
        Self { inner, runtime }
    }

    /// Post a request and decode the JSON response body
    pub fn post_json(&self, request: TransportRequest) -> Result<Value, A2AError> {
        self.runtime.block_on(self.inner.post_json(request))
    }

    /// Open an SSE subscription and iterate its events synchronously
    pub fn subscribe(&self, request: TransportRequest) -> Result<BlockingEventStream, A2AError> {
        let stream = self.runtime.block_on(self.inner.subscribe(request))?;
        Ok(BlockingEventStream::new(stream, self.runtime.clone()))
    }

    /// The wrapped async transport
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

/// Iterator over the events of a subscription
///
/// Each call to `next` blocks until the agent sends the next event. Dropping the
/// iterator closes the underlying connection.
pub struct BlockingEventStream {
    stream: EventStream,
    runtime: Arc<Runtime>,
}

impl BlockingEventStream {
    pub(crate) fn new(stream: EventStream, runtime: Arc<Runtime>) -> Self {
        Self { stream, runtime }
    }
}

impl Iterator for BlockingEventStream {
    type Item = Result<StreamEvent, A2AError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.stream.next())
    }
}

impl fmt::Debug for BlockingEventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingEventStream").finish_non_exhaustive()
    }
}
