//! Server-Sent Events (SSE) codec for streaming A2A responses
//!
//! Events are surfaced as-is: the event name selects an [`EventKind`] and the
//! data payload is kept as raw text. Interpreting the payload is left to the
//! stream accumulator.

use std::pin::Pin;

use eventsource_stream::{EventStreamError, Eventsource};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::protocol::error::{A2AError, BoxError};

/// Stream of events from a task subscription
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, A2AError>> + Send>>;

/// Kind of a server-sent event, taken from its `event:` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Default kind: status and artifact updates
    Message,

    /// The agent reported an error and will send nothing further
    Error,

    /// The agent closed the stream
    Close,

    /// Any other event name
    Other(String),
}

impl EventKind {
    /// Map an SSE event name to its kind; an empty name is a `message`
    pub fn from_name(name: &str) -> Self {
        match name {
            "" | "message" => EventKind::Message,
            "error" => EventKind::Error,
            "close" => EventKind::Close,
            other => EventKind::Other(other.to_string()),
        }
    }
}

/// A single server-sent event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Event kind
    pub kind: EventKind,

    /// Raw event payload (normally a JSON-RPC response)
    pub data: String,

    /// Event id, if the agent set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl StreamEvent {
    /// Create an event of the given kind
    pub fn new(kind: EventKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
            id: None,
        }
    }

    /// Create a `message` event
    pub fn message(data: impl Into<String>) -> Self {
        Self::new(EventKind::Message, data)
    }

    /// Create an `error` event
    pub fn error(data: impl Into<String>) -> Self {
        Self::new(EventKind::Error, data)
    }

    /// Create a `close` event
    pub fn close() -> Self {
        Self::new(EventKind::Close, "")
    }
}

/// SSE codec for parsing streaming responses
#[derive(Debug, Clone, Default)]
pub struct SseCodec;

impl SseCodec {
    /// Create a new SSE codec
    pub fn new() -> Self {
        Self
    }

    /// Parse an SSE byte stream into a stream of events
    ///
    /// Every failure while reading or parsing the stream is reported as
    /// [`A2AError::Stream`] wrapping the underlying cause.
    pub fn parse_stream<S, B, E>(&self, byte_stream: S) -> EventStream
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let events = byte_stream.eventsource().map(|result| match result {
            Ok(event) => Ok(StreamEvent {
                kind: EventKind::from_name(&event.event),
                data: event.data,
                id: (!event.id.is_empty()).then_some(event.id),
            }),
            Err(EventStreamError::Transport(e)) => Err(A2AError::stream("SSE transport error", e)),
            Err(EventStreamError::Utf8(e)) => {
                Err(A2AError::stream("SSE stream is not valid UTF-8", e))
            }
            Err(EventStreamError::Parser(e)) => {
                Err(A2AError::stream_msg(format!("SSE parse error: {}", e)))
            }
        });

        Box::pin(events)
    }
}
