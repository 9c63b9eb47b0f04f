//! Serialization codecs for the JSON-RPC binding and its SSE stream

pub mod jsonrpc;
pub mod sse;

pub use jsonrpc::{JsonRpcCodec, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use sse::{EventKind, EventStream, SseCodec, StreamEvent};

use bytes::Bytes;
use serde_json::Value;

use crate::{
    protocol::{error::A2AError, operation::TaskOperation},
    service::response::A2AResponse,
};

/// Codec trait for encoding and decoding A2A task operations
pub trait Codec: Send + Sync {
    /// Serialize a task operation to a request body
    ///
    /// # Arguments
    ///
    /// * `operation` - The task operation to encode
    ///
    /// # Returns
    ///
    /// The serialized bytes or an error
    fn encode_request(&self, operation: &TaskOperation) -> Result<Bytes, A2AError>;

    /// Interpret a decoded JSON response body
    ///
    /// # Arguments
    ///
    /// * `response` - The JSON body returned by the agent
    /// * `operation` - The original operation (for context)
    fn decode_response(
        &self,
        response: Value,
        operation: &TaskOperation,
    ) -> Result<A2AResponse, A2AError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &str;
}
