//! A2A task types and lifecycle management

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{
    error::A2AError,
    message::{Message, Metadata},
    Artifact,
};

/// Text returned by [`Task::render_text`] when a task carries no convertible parts
pub const NO_PROCESSABLE_PARTS: &str = "Received response, but it contained no processable parts.";

/// A task in the A2A protocol
///
/// Tasks are created by the caller, mutated by the remote agent as work progresses
/// and re-fetched by id. They are never deleted locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Caller-chosen identifier for the task
    pub id: String,

    /// Conversation-scoping session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Current status of the task
    pub status: TaskStatus,

    /// Output artifacts, in the order the agent produced them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// Message history, when the agent returns it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    /// Free-form task metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Task {
    /// Create a new submitted task
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            session_id: None,
            status: TaskStatus::new(TaskState::Submitted),
            artifacts: Vec::new(),
            history: Vec::new(),
            metadata: None,
        }
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Update the task status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Append an artifact
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Render the task's status message and artifacts as plain text
    ///
    /// Status message parts come first, then the parts of every artifact in order.
    /// Fails with [`A2AError::Unsupported`] if any part is a file reference.
    pub fn render_text(&self) -> Result<String, A2AError> {
        let status_parts = self.status.message.iter().flat_map(|m| m.parts.iter());
        let artifact_parts = self.artifacts.iter().flat_map(|a| a.parts.iter());

        let rendered = status_parts
            .chain(artifact_parts)
            .map(|part| part.convert().map(|content| content.to_string()))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        if rendered.is_empty() {
            Ok(NO_PROCESSABLE_PARTS.to_string())
        } else {
            Ok(rendered)
        }
    }
}

/// Current status of a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// Optional message from the agent describing the state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// When the agent recorded this status
    ///
    /// Timestamps without an offset are read as UTC. Unparseable values are dropped.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::String(raw)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(parse_timestamp(&raw))
}

/// Parse an RFC 3339 timestamp, or an ISO 8601 one without offset as UTC
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl TaskStatus {
    /// Create a status without a message
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: None,
        }
    }

    /// Attach a status message
    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }
}

/// Task state in the A2A protocol lifecycle
///
/// Task lifecycle: submitted → working → completed/failed/canceled
/// Non-terminal pause: input-required
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received and is queued for processing
    Submitted,

    /// Task is currently being processed
    Working,

    /// Task requires additional input from the client
    InputRequired,

    /// Task completed successfully
    Completed,

    /// Task was canceled
    Canceled,

    /// Task failed with an error
    Failed,

    /// State not recognised by this client
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed
        )
    }
}

/// Parameters of `tasks/send` and `tasks/sendSubscribe`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSendParams {
    /// Task identifier
    pub id: String,

    /// Session identifier
    pub session_id: String,

    /// The user message to deliver
    pub message: Message,

    /// Request metadata, propagated onto the returned task
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl TaskSendParams {
    /// Build send parameters for a single text message
    ///
    /// The message carries an empty metadata map and the request metadata records
    /// the session as `conversation_id`.
    pub fn new(
        task_id: impl Into<String>,
        session_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let session_id = session_id.into();
        let message = Message {
            metadata: Some(Metadata::new()),
            ..Message::user(text)
        };

        let mut metadata = Metadata::new();
        metadata.insert(
            "conversation_id".to_string(),
            serde_json::Value::String(session_id.clone()),
        );

        Self {
            id: task_id.into(),
            session_id,
            message,
            metadata: Some(metadata),
        }
    }
}

/// Parameters of `tasks/get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskQueryParams {
    /// Task identifier
    pub id: String,
}

/// Incremental update carried in the `result` of a streamed event
///
/// Status updates populate `status`, artifact updates populate `artifact`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskEvent {
    /// Task the update belongs to
    #[serde(default)]
    pub id: Option<String>,

    /// New task status
    #[serde(default)]
    pub status: Option<TaskStatus>,

    /// New or updated artifact
    #[serde(default)]
    pub artifact: Option<Artifact>,

    /// Whether the agent marked this as the last update
    #[serde(rename = "final", default)]
    pub final_event: bool,

    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::protocol::message::Part;

    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("task-123").with_session_id("session-1");

        assert_eq!(task.id, "task-123");
        assert_eq!(task.session_id.as_deref(), Some("session-1"));
        assert_eq!(task.status.state, TaskState::Submitted);
        assert!(!task.is_terminal());
    }

    #[test]
    fn test_task_state() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());
    }

    #[test]
    fn test_unknown_state_decodes() {
        let status: TaskStatus = serde_json::from_value(json!({"state": "paused"})).unwrap();
        assert_eq!(status.state, TaskState::Unknown);
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "status": {"state": "completed", "timestamp": "2025-04-01T12:34:56.123456"}
        }))
        .unwrap();

        let timestamp = task.status.timestamp.unwrap();
        assert_eq!(timestamp.to_rfc3339(), "2025-04-01T12:34:56.123456+00:00");
    }

    #[test]
    fn test_offset_timestamp_is_normalized() {
        let parsed = parse_timestamp("2025-04-01T14:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-04-01T12:00:00+00:00");
    }

    #[test]
    fn test_unparseable_timestamp_is_dropped() {
        let status: TaskStatus = serde_json::from_value(json!({
            "state": "working",
            "timestamp": "yesterday"
        }))
        .unwrap();

        assert_eq!(status.state, TaskState::Working);
        assert!(status.timestamp.is_none());
    }

    #[test]
    fn test_send_params_shape() {
        let params = TaskSendParams::new("t1", "s1", "hi");
        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["id"], "t1");
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["message"]["role"], "user");
        assert_eq!(json["message"]["metadata"], json!({}));
        assert_eq!(
            json["message"]["parts"],
            json!([{"type": "text", "text": "hi", "metadata": null}])
        );
        assert_eq!(json["metadata"], json!({"conversation_id": "s1"}));
    }

    #[test]
    fn test_render_text_orders_status_then_artifacts() {
        let task = Task::new("t1")
            .with_status(
                TaskStatus::new(TaskState::Completed).with_message(Message::agent("summary")),
            )
            .with_artifact(Artifact::new(vec![
                Part::text("table"),
                Part::data(json!({"total": 42})),
            ]));

        assert_eq!(task.render_text().unwrap(), "summary\ntable\n{\"total\":42}");
    }

    #[test]
    fn test_render_text_without_parts() {
        let task = Task::new("t1").with_status(TaskStatus::new(TaskState::Completed));
        assert_eq!(task.render_text().unwrap(), NO_PROCESSABLE_PARTS);
    }

    #[test]
    fn test_render_text_rejects_file_parts() {
        let task = Task::new("t1")
            .with_artifact(Artifact::new(vec![Part::file("a.csv", "file:///a.csv")]));

        assert!(matches!(
            task.render_text(),
            Err(A2AError::Unsupported(_))
        ));
    }

    #[test]
    fn test_task_serialization() {
        let task = Task::new("task-123").with_session_id("s-1");

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "task-123");
        assert_eq!(json["sessionId"], "s-1");
        assert_eq!(json["status"]["state"], "submitted");

        let deserialized: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task, deserialized);
    }

    #[test]
    fn test_task_event_decodes_artifact_update() {
        let event: TaskEvent = serde_json::from_value(json!({
            "id": "t1",
            "artifact": {"parts": [{"type": "text", "text": "chunk"}], "index": 0},
            "final": true
        }))
        .unwrap();

        assert!(event.final_event);
        assert!(event.status.is_none());
        assert_eq!(event.artifact.unwrap().parts[0].as_text(), Some("chunk"));
    }
}
