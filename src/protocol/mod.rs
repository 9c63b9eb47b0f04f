//! Core A2A protocol types and definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;
pub mod message;
pub mod metadata;
pub mod operation;
pub mod task;

pub use error::{A2AError, A2AResult};
pub use message::{Message, Metadata, Part, PartContent, Role};
pub use operation::TaskOperation;
pub use task::{Task, TaskEvent, TaskQueryParams, TaskSendParams, TaskState, TaskStatus};

/// Generate an opaque identifier: `prefix` followed by 12 random hex digits
pub fn generate_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &suffix[..12])
}

/// Artifacts represent task outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// A human readable name for the Artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A human readable description of the Artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Contents of the Artifact
    pub parts: Vec<Part>,

    /// Position of this artifact among the task's outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Whether the parts extend a previously streamed artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,

    /// Whether this is the last chunk of a streamed artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_chunk: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Artifact {
    /// Create an artifact from its parts
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            name: None,
            description: None,
            parts,
            index: None,
            append: None,
            last_chunk: None,
            metadata: None,
        }
    }

    /// Set the artifact name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
