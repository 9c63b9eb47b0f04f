//! High-level A2A task client

use std::time::Duration;

use tower::ServiceExt;
use tower_service::Service;
use tracing::debug;

use crate::{
    client::config::ClientConfig,
    codec::EventStream,
    protocol::{
        error::A2AError,
        generate_id,
        metadata::{merge_message_metadata, merge_metadata},
        Task, TaskOperation, TaskSendParams,
    },
    service::{A2ARequest, A2AResponse, RequestContext},
};

/// Prefix of generated task ids
pub const TASK_ID_PREFIX: &str = "delegate-task";

/// Prefix of generated session ids
pub const SESSION_ID_PREFIX: &str = "delegate-session";

/// Generate a fresh task id
pub fn new_task_id() -> String {
    generate_id(TASK_ID_PREFIX)
}

/// Generate a fresh session id
pub fn new_session_id() -> String {
    generate_id(SESSION_ID_PREFIX)
}

/// High-level A2A client for submitting and fetching tasks
///
/// This client wraps a Tower service and provides the three task operations.
/// The service is generic over any implementation that satisfies the Service trait bounds.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_delegate::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let config = ClientConfig::from_env()?;
/// let mut client = A2AClientBuilder::from_config(config).build()?;
///
/// let task = client.send_task("task-1", "What was Q3 revenue?", None).await?;
/// println!("{}", task.render_text()?);
/// # Ok(())
/// # }
/// ```
pub struct TaskClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> TaskClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new task client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn context(&self, timeout: Option<Duration>) -> RequestContext {
        RequestContext::new(timeout)
    }

    async fn call(&mut self, request: A2ARequest) -> Result<A2AResponse, A2AError> {
        self.service.ready().await?.call(request).await
    }

    /// Submit a task and wait for the agent's task object
    ///
    /// A session id is generated when `session_id` is `None`. The request metadata
    /// is merged onto the returned task and its status message, rotating the
    /// message identity.
    ///
    /// # Errors
    ///
    /// [`A2AError::Http`] and [`A2AError::Communication`] for transport failures,
    /// [`A2AError::Rpc`] when the agent answers with a JSON-RPC error.
    pub async fn send_task(
        &mut self,
        task_id: impl Into<String>,
        text: impl Into<String>,
        session_id: Option<String>,
    ) -> Result<Task, A2AError> {
        let session_id = session_id.unwrap_or_else(new_session_id);
        let params = TaskSendParams::new(task_id, session_id, text);
        debug!(task_id = %params.id, session_id = %params.session_id, "sending task");

        let request = A2ARequest::new(
            TaskOperation::Send(params.clone()),
            self.context(Some(self.config.timeout)),
        );
        let mut task = self
            .call(request)
            .await?
            .into_task()
            .ok_or_else(|| A2AError::Protocol("Expected task response from tasks/send".into()))?;

        merge_metadata(&mut task, &params);
        if let Some(message) = task.status.message.as_mut() {
            merge_message_metadata(message, &params.message);
        }

        Ok(task)
    }

    /// Submit a task and subscribe to its update stream
    ///
    /// The stream yields raw events; feed it to a
    /// [`StreamAccumulator`](crate::stream::StreamAccumulator) to collect the text.
    pub async fn send_subscribe_task(
        &mut self,
        task_id: impl Into<String>,
        text: impl Into<String>,
        session_id: Option<String>,
    ) -> Result<EventStream, A2AError> {
        let session_id = session_id.unwrap_or_else(new_session_id);
        let params = TaskSendParams::new(task_id, session_id, text);
        debug!(task_id = %params.id, session_id = %params.session_id, "subscribing to task");

        let request = A2ARequest::new(
            TaskOperation::SendSubscribe(params),
            self.context(self.config.stream_timeout),
        );

        self.call(request).await?.into_stream().ok_or_else(|| {
            A2AError::Protocol("Expected event stream from tasks/sendSubscribe".into())
        })
    }

    /// Get a task by ID
    ///
    /// # Arguments
    ///
    /// * `task_id` - The unique identifier of the task to retrieve
    pub async fn get_task(&mut self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let request = A2ARequest::new(
            TaskOperation::get(task_id),
            self.context(Some(self.config.timeout)),
        );

        self.call(request)
            .await?
            .into_task()
            .ok_or_else(|| A2AError::Protocol("Expected task response from tasks/get".into()))
    }
}
