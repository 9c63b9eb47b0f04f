//! Synchronous task client
//!
//! Drives a [`TaskClient`] on a private current-thread runtime. Must not be used
//! from inside another Tokio runtime.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tower_service::Service;

use crate::{
    client::{builder::A2AStack, A2AClientBuilder, ClientConfig, TaskClient},
    protocol::{error::A2AError, Task},
    service::{A2ARequest, A2AResponse},
    transport::{blocking::blocking_runtime, BlockingEventStream, HttpTransport, Transport},
};

/// Blocking counterpart of [`TaskClient`]
pub struct BlockingTaskClient<S> {
    inner: TaskClient<S>,
    runtime: Arc<Runtime>,
}

impl<S> BlockingTaskClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Wrap an async client with its own runtime
    pub fn new(inner: TaskClient<S>) -> Result<Self, A2AError> {
        Ok(Self {
            inner,
            runtime: blocking_runtime()?,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    /// Submit a task and block until the agent returns the task object
    pub fn send_task(
        &mut self,
        task_id: impl Into<String>,
        text: impl Into<String>,
        session_id: Option<String>,
    ) -> Result<Task, A2AError> {
        self.runtime.block_on(self.inner.send_task(task_id, text, session_id))
    }

    /// Submit a task and iterate its update events synchronously
    pub fn send_subscribe_task(
        &mut self,
        task_id: impl Into<String>,
        text: impl Into<String>,
        session_id: Option<String>,
    ) -> Result<BlockingEventStream, A2AError> {
        let stream = self
            .runtime
            .block_on(self.inner.send_subscribe_task(task_id, text, session_id))?;
        Ok(BlockingEventStream::new(stream, self.runtime.clone()))
    }

    /// Fetch a task by ID, blocking the calling thread
    pub fn get_task(&mut self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        self.runtime.block_on(self.inner.get_task(task_id))
    }
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Build a blocking client
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build), plus [`A2AError::Configuration`] when the
    /// runtime cannot be started.
    pub fn build_blocking(self) -> Result<BlockingTaskClient<A2AStack<T>>, A2AError> {
        BlockingTaskClient::new(self.build()?)
    }
}

impl BlockingTaskClient<A2AStack<HttpTransport>> {
    /// Build a blocking HTTP client from a configuration
    pub fn from_config(config: ClientConfig) -> Result<Self, A2AError> {
        A2AClientBuilder::from_config(config).build_blocking()
    }
}
