//! Folds the events of a task subscription into one result

use std::{fmt, ops::ControlFlow};

use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    codec::{EventKind, EventStream, JsonRpcResponse, StreamEvent},
    protocol::{error::A2AError, message::Part},
};

/// Result text when the stream ended before any event arrived
pub const NO_EVENTS_RECEIVED: &str =
    "A2A agent connection succeeded, but no events were received.";

/// Result text when events arrived but none carried text
pub const NO_TEXT_CONTENT: &str = "A2A agent stream finished, but contained no text content.";

/// Accumulator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    /// Consuming events
    Streaming,

    /// The agent closed the stream or it ended
    Done,

    /// The agent sent an error event or the stream failed
    Errored,
}

/// Terminal result of a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Accumulated text, fragments joined by newlines
    Text(String),

    /// The stream ended without a single event
    NoEvents,

    /// Events arrived but none carried text
    NoText,

    /// The stream failed; carries the error description
    Failed(String),
}

impl StreamOutcome {
    /// Check if the subscription failed
    pub fn is_error(&self) -> bool {
        matches!(self, StreamOutcome::Failed(_))
    }

    /// Result text, substituting the sentinel messages for empty streams
    ///
    /// A failed stream becomes [`A2AError::Delegation`].
    pub fn into_result(self) -> Result<String, A2AError> {
        match self {
            StreamOutcome::Text(text) => Ok(text),
            StreamOutcome::NoEvents => Ok(NO_EVENTS_RECEIVED.to_string()),
            StreamOutcome::NoText => Ok(NO_TEXT_CONTENT.to_string()),
            StreamOutcome::Failed(message) => Err(A2AError::Delegation(message)),
        }
    }
}

impl fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamOutcome::Text(text) => f.write_str(text),
            StreamOutcome::NoEvents => f.write_str(NO_EVENTS_RECEIVED),
            StreamOutcome::NoText => f.write_str(NO_TEXT_CONTENT),
            StreamOutcome::Failed(message) => f.write_str(message),
        }
    }
}

/// State machine consuming [`StreamEvent`]s
///
/// `error` events and stream failures move it to [`AccumulatorState::Errored`],
/// `close` events to [`AccumulatorState::Done`]. Every other event is decoded as
/// a JSON-RPC response whose status message and artifact text parts are collected.
#[derive(Debug)]
pub struct StreamAccumulator {
    state: AccumulatorState,
    events_received: usize,
    fragments: Vec<String>,
    error: Option<String>,
}

impl Default for StreamAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamAccumulator {
    /// Create an accumulator in the streaming state
    pub fn new() -> Self {
        Self {
            state: AccumulatorState::Streaming,
            events_received: 0,
            fragments: Vec::new(),
            error: None,
        }
    }

    /// Current state
    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    /// Number of events consumed so far
    pub fn events_received(&self) -> usize {
        self.events_received
    }

    /// Feed one event; `Break` means no further events should be read
    pub fn push(&mut self, event: &StreamEvent) -> ControlFlow<()> {
        if self.state != AccumulatorState::Streaming {
            return ControlFlow::Break(());
        }
        self.events_received += 1;

        match &event.kind {
            EventKind::Error => {
                let message = format!("A2A SSE Error Event: {}", error_text(&event.data));
                error!(reason = %message, "agent reported an error");
                self.error = Some(message);
                self.state = AccumulatorState::Errored;
                ControlFlow::Break(())
            }
            EventKind::Close => {
                debug!("stream closed by agent");
                self.state = AccumulatorState::Done;
                ControlFlow::Break(())
            }
            EventKind::Message | EventKind::Other(_) => {
                self.collect(&event.data);
                ControlFlow::Continue(())
            }
        }
    }

    /// Record a failure of the underlying stream
    pub fn fail(&mut self, err: &A2AError) {
        if self.state != AccumulatorState::Streaming {
            return;
        }

        let message = match err {
            A2AError::Stream { .. } => format!("A2A Streaming Error: {}", err),
            _ => format!("A2A Connection Error: {}", err),
        };
        error!(reason = %message, "subscription failed");
        self.error = Some(message);
        self.state = AccumulatorState::Errored;
    }

    /// Finish accumulation; an unterminated stream counts as done
    pub fn finish(self) -> StreamOutcome {
        if self.state == AccumulatorState::Errored {
            return StreamOutcome::Failed(self.error.unwrap_or_default());
        }

        if self.events_received == 0 {
            StreamOutcome::NoEvents
        } else if self.fragments.is_empty() {
            StreamOutcome::NoText
        } else {
            StreamOutcome::Text(self.fragments.join("\n"))
        }
    }

    /// Drain an async event stream
    ///
    /// The stream is dropped, closing its connection, as soon as a terminal event
    /// arrives.
    pub async fn accumulate(mut stream: EventStream) -> StreamOutcome {
        let mut accumulator = Self::new();

        while let Some(item) = stream.next().await {
            match item {
                Ok(event) => {
                    if accumulator.push(&event).is_break() {
                        break;
                    }
                }
                Err(err) => {
                    accumulator.fail(&err);
                    break;
                }
            }
        }

        accumulator.finish()
    }

    /// Drain a synchronous event iterator
    pub fn accumulate_iter<I>(events: I) -> StreamOutcome
    where
        I: IntoIterator<Item = Result<StreamEvent, A2AError>>,
    {
        let mut accumulator = Self::new();

        for item in events {
            match item {
                Ok(event) => {
                    if accumulator.push(&event).is_break() {
                        break;
                    }
                }
                Err(err) => {
                    accumulator.fail(&err);
                    break;
                }
            }
        }

        accumulator.finish()
    }

    fn collect(&mut self, data: &str) {
        let response: JsonRpcResponse = match serde_json::from_str(data) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, data = %truncate(data), "ignoring undecodable event data");
                return;
            }
        };

        if let Some(rpc_error) = response.error {
            warn!(
                code = rpc_error.code,
                rpc_message = %rpc_error.message,
                "ignoring JSON-RPC error inside message event"
            );
            return;
        }

        let Some(update) = response.result else {
            debug!(data = %truncate(data), "event without result");
            return;
        };

        // Status and artifact are read separately so a malformed field in one
        // does not hide the text of the other.
        if let Some(status) = update.get("status") {
            debug!(state = ?status.get("state"), "status update");
            self.extend_text(status.pointer("/message/parts"));
        }

        if let Some(artifact) = update.get("artifact") {
            debug!(name = ?artifact.get("name"), "artifact update");
            self.extend_text(artifact.get("parts"));
        }
    }

    fn extend_text(&mut self, parts: Option<&Value>) {
        let Some(parts) = parts.and_then(Value::as_array) else {
            return;
        };

        for raw in parts {
            match Part::deserialize(raw) {
                Ok(part) => {
                    if let Some(text) = part.as_text().filter(|text| !text.is_empty()) {
                        self.fragments.push(text.to_string());
                    }
                }
                Err(e) => warn!(error = %e, "skipping malformed part"),
            }
        }
    }
}

/// Error description of an `error` event: its `message` field, or the raw data
fn error_text(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(value) => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| data.to_string()),
        Err(_) => data.to_string(),
    }
}

fn truncate(data: &str) -> &str {
    match data.char_indices().nth(100) {
        Some((idx, _)) => &data[..idx],
        None => data,
    }
}
