//! A2A task operations

use super::{
    generate_id,
    task::{TaskQueryParams, TaskSendParams},
};

/// The task operations supported by this client
///
/// Every operation is a JSON-RPC 2.0 call posted to the agent's single endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOperation {
    /// Submit a task and wait for the final task object
    Send(TaskSendParams),

    /// Submit a task and subscribe to its SSE update stream
    SendSubscribe(TaskSendParams),

    /// Fetch a task by ID
    Get(TaskQueryParams),
}

impl TaskOperation {
    /// Build a `tasks/send` operation for a text message
    pub fn send(
        task_id: impl Into<String>,
        session_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::Send(TaskSendParams::new(task_id, session_id, text))
    }

    /// Build a `tasks/sendSubscribe` operation for a text message
    pub fn send_subscribe(
        task_id: impl Into<String>,
        session_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::SendSubscribe(TaskSendParams::new(task_id, session_id, text))
    }

    /// Build a `tasks/get` operation
    pub fn get(task_id: impl Into<String>) -> Self {
        Self::Get(TaskQueryParams { id: task_id.into() })
    }

    /// The JSON-RPC method name for this operation
    pub fn method(&self) -> &'static str {
        match self {
            TaskOperation::Send(_) => "tasks/send",
            TaskOperation::SendSubscribe(_) => "tasks/sendSubscribe",
            TaskOperation::Get(_) => "tasks/get",
        }
    }

    /// Generate a fresh JSON-RPC request id, prefixed by the operation
    pub fn request_id(&self) -> String {
        let prefix = match self {
            TaskOperation::Send(_) => "req-send",
            TaskOperation::SendSubscribe(_) => "req-sub",
            TaskOperation::Get(_) => "req-get",
        };
        generate_id(prefix)
    }

    /// The task this operation targets
    pub fn task_id(&self) -> &str {
        match self {
            TaskOperation::Send(params) | TaskOperation::SendSubscribe(params) => &params.id,
            TaskOperation::Get(params) => &params.id,
        }
    }

    /// Check if this operation expects a streaming response
    pub fn is_streaming(&self) -> bool {
        matches!(self, TaskOperation::SendSubscribe(_))
    }
}
