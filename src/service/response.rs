//! A2A service response types

use std::fmt;

use crate::{codec::EventStream, protocol::task::Task};

/// Response from an A2A service operation
pub enum A2AResponse {
    /// Task response (from `tasks/send` and `tasks/get`)
    Task(Box<Task>),

    /// Event stream (from `tasks/sendSubscribe`)
    Stream(EventStream),
}

impl A2AResponse {
    /// Extract a task from the response, if present
    pub fn into_task(self) -> Option<Task> {
        match self {
            A2AResponse::Task(task) => Some(*task),
            _ => None,
        }
    }

    /// Extract an event stream from the response, if present
    pub fn into_stream(self) -> Option<EventStream> {
        match self {
            A2AResponse::Stream(stream) => Some(stream),
            _ => None,
        }
    }
}

impl fmt::Debug for A2AResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A2AResponse::Task(task) => f.debug_tuple("Task").field(task).finish(),
            A2AResponse::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
