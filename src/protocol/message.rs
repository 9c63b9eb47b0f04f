//! A2A message types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::A2AError;

/// Free-form metadata attached to tasks, messages and parts
pub type Metadata = HashMap<String, Value>;

/// A message in the A2A protocol
///
/// Messages carry a role and an ordered list of parts. The same type is used for
/// the conversation exchanged with the language model during delegation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Message content parts
    pub parts: Vec<Part>,

    /// Optional metadata for the message
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl Message {
    /// Create a new message with a single text part
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
            metadata: None,
        }
    }

    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    /// Create a system message with text content
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Add a metadata field to the message
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Add a message part
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Concatenated text of all text parts, newline separated
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user
    User,

    /// Message from an AI agent
    Agent,

    /// Instruction or tool output injected by the caller
    System,

    /// Any role this client does not know
    #[serde(other)]
    Unknown,
}

/// Opaque file reference carried by file parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    /// Name of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// MIME type of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// URI reference to the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Base64-encoded file content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
}

/// A part of a message or artifact
///
/// The `type` tag selects exactly one payload: text, data or file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    /// Text content
    Text {
        /// The text content
        text: String,

        /// Part metadata (serialized as `null` when absent)
        #[serde(default)]
        metadata: Option<Metadata>,
    },

    /// Structured data
    Data {
        /// The structured data
        data: Value,

        #[serde(default)]
        metadata: Option<Metadata>,
    },

    /// File reference
    File {
        /// The file reference
        file: FileContent,

        #[serde(default)]
        metadata: Option<Metadata>,
    },

    /// A part type this client does not understand
    #[serde(other)]
    Unknown,
}

/// Plain content extracted from a [`Part`]
#[derive(Debug, Clone, PartialEq)]
pub enum PartContent {
    Text(String),
    Data(Value),
}

impl std::fmt::Display for PartContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartContent::Text(text) => f.write_str(text),
            PartContent::Data(data) => write!(f, "{}", data),
        }
    }
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            metadata: None,
        }
    }

    /// Create a data part
    pub fn data(data: Value) -> Self {
        Self::Data {
            data,
            metadata: None,
        }
    }

    /// Create a file part referencing a URI
    pub fn file(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::File {
            file: FileContent {
                name: Some(name.into()),
                mime_type: None,
                uri: Some(uri.into()),
                bytes: None,
            },
            metadata: None,
        }
    }

    /// The text payload, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Convert the part into plain content
    ///
    /// File parts cannot be represented as plain content and fail with
    /// [`A2AError::Unsupported`] instead of being dropped.
    pub fn convert(&self) -> Result<PartContent, A2AError> {
        match self {
            Part::Text { text, .. } => Ok(PartContent::Text(text.clone())),
            Part::Data { data, .. } => Ok(PartContent::Data(data.clone())),
            Part::File { .. } => Err(A2AError::Unsupported(
                "File parts are not supported".into(),
            )),
            Part::Unknown => Err(A2AError::Unsupported("Unknown part type".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.parts.len(), 1);
        assert_eq!(msg.parts[0].as_text(), Some("Hello, agent!"));
    }

    #[test]
    fn test_message_text_skips_non_text_parts() {
        let msg = Message::agent("first")
            .with_part(Part::data(json!({"rows": 3})))
            .with_part(Part::text("second"));

        assert_eq!(msg.text(), "first\nsecond");
    }

    #[test]
    fn test_part_tag_selects_payload() {
        let json = serde_json::to_value(Part::text("hi")).unwrap();
        assert_eq!(json, json!({"type": "text", "text": "hi", "metadata": null}));

        let json = serde_json::to_value(Part::data(json!({"k": 1}))).unwrap();
        assert_eq!(json["type"], "data");
        assert!(json.get("text").is_none());
    }

    #[test]
    fn test_unknown_part_type_decodes() {
        let part: Part = serde_json::from_value(json!({"type": "audio", "clip": "x"})).unwrap();
        assert_eq!(part, Part::Unknown);
    }

    #[test]
    fn test_unknown_role_keeps_parts() {
        let msg: Message = serde_json::from_value(json!({
            "role": "tool",
            "parts": [{"type": "text", "text": "lookup done"}]
        }))
        .unwrap();

        assert_eq!(msg.role, Role::Unknown);
        assert_eq!(msg.text(), "lookup done");
    }

    #[test]
    fn test_convert_text_part() {
        assert_eq!(
            Part::text("hello").convert().unwrap(),
            PartContent::Text("hello".into())
        );
    }

    #[test]
    fn test_convert_data_part_is_unchanged() {
        let value = json!({"revenue": [1, 2, 3], "currency": "EUR"});
        assert_eq!(
            Part::data(value.clone()).convert().unwrap(),
            PartContent::Data(value)
        );
    }

    #[test]
    fn test_convert_file_part_is_unsupported() {
        let err = Part::file("report.pdf", "https://example.com/report.pdf")
            .convert()
            .unwrap_err();

        match err {
            A2AError::Unsupported(msg) => assert!(msg.contains("not supported")),
            other => panic!("Expected Unsupported error, got {other:?}"),
        }
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::system("Test message").with_metadata("message_id", json!("m1"));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"system\""));

        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }
}
