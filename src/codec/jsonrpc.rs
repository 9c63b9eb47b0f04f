//! JSON-RPC 2.0 codec for A2A task operations
//!
//! This codec wraps task operations in JSON-RPC 2.0 envelopes and unwraps the
//! `result` of responses into typed tasks.

use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    codec::Codec,
    protocol::{error::A2AError, operation::TaskOperation, task::Task},
    service::response::A2AResponse,
};

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest<P = Value> {
    pub jsonrpc: String,
    pub method: String,
    pub params: P,
    pub id: String,
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse<R = Value> {
    pub jsonrpc: Option<String>,
    pub result: Option<R>,
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<JsonRpcError> for A2AError {
    fn from(error: JsonRpcError) -> Self {
        A2AError::Rpc {
            code: error.code,
            message: error.message,
            data: error.data,
        }
    }
}

impl<R> JsonRpcResponse<R> {
    /// Extract the result, giving an `error` object priority over `result`
    pub fn into_result(self) -> Result<R, A2AError> {
        if let Some(error) = self.error {
            return Err(error.into());
        }

        self.result.ok_or_else(|| {
            A2AError::Protocol("JSON-RPC response missing 'result' field".to_string())
        })
    }
}

impl JsonRpcResponse<Value> {
    /// Extract the result and decode it into `T`
    pub fn decode_result<T: DeserializeOwned>(self) -> Result<T, A2AError> {
        let result = self.into_result()?;
        Ok(serde_json::from_value(result)?)
    }
}

/// JSON-RPC 2.0 codec for the three task operations
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self
    }

    /// Build the request envelope for an operation with a fresh request id
    pub fn envelope(&self, operation: &TaskOperation) -> Result<JsonRpcRequest, A2AError> {
        let params = match operation {
            TaskOperation::Send(params) | TaskOperation::SendSubscribe(params) => {
                serde_json::to_value(params)?
            }
            TaskOperation::Get(params) => serde_json::to_value(params)?,
        };

        Ok(JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: operation.method().to_string(),
            params,
            id: operation.request_id(),
        })
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(&self, operation: &TaskOperation) -> Result<Bytes, A2AError> {
        let request = self.envelope(operation)?;
        let bytes = serde_json::to_vec(&request)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        response: Value,
        operation: &TaskOperation,
    ) -> Result<A2AResponse, A2AError> {
        if operation.is_streaming() {
            return Err(A2AError::Protocol(format!(
                "{} responses are delivered as an SSE stream",
                operation.method()
            )));
        }

        let envelope: JsonRpcResponse = serde_json::from_value(response).map_err(|e| {
            A2AError::Protocol(format!("Failed to parse JSON-RPC response: {}", e))
        })?;

        let task: Task = envelope.decode_result()?;
        Ok(A2AResponse::Task(Box::new(task)))
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
