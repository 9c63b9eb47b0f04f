//! Collaborators of the delegation loop

use async_trait::async_trait;
use tower_service::Service;

use crate::{
    client::TaskClient,
    codec::EventStream,
    protocol::{error::A2AError, Message},
    service::{A2ARequest, A2AResponse},
};

/// A chat model that completes a conversation with one reply
///
/// Implementations report their own failures as [`A2AError::Model`].
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Produce the next message for `conversation`
    async fn complete(&self, conversation: &[Message]) -> Result<Message, A2AError>;
}

/// Something that can hand a query to a remote agent as a streamed task
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskDelegate: Send {
    /// Submit `text` as task `task_id` and return its update stream
    async fn send_subscribe_task(
        &mut self,
        task_id: String,
        text: String,
        session_id: Option<String>,
    ) -> Result<EventStream, A2AError>;
}

#[async_trait]
impl<S> TaskDelegate for TaskClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Send,
    S::Future: Send,
{
    async fn send_subscribe_task(
        &mut self,
        task_id: String,
        text: String,
        session_id: Option<String>,
    ) -> Result<EventStream, A2AError> {
        TaskClient::send_subscribe_task(self, task_id, text, session_id).await
    }
}
