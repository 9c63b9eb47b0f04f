//! A2A service request types

use std::{collections::HashMap, time::Duration};

use crate::protocol::operation::TaskOperation;

/// Default deadline for request/response calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A request to the A2A service
///
/// This wraps a task operation with the context needed for execution
#[derive(Debug, Clone)]
pub struct A2ARequest {
    /// The task operation to execute
    pub operation: TaskOperation,

    /// Request context (headers, timeout)
    pub context: RequestContext,
}

impl A2ARequest {
    /// Create a new A2A request
    pub fn new(operation: TaskOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }
}

/// Request context containing headers and the call deadline
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Additional headers (authentication is injected here by `AuthLayer`)
    pub headers: HashMap<String, String>,
}

impl RequestContext {
    /// Create a request context with the given timeout
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            headers: HashMap::new(),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TIMEOUT))
    }
}
