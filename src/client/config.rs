//! Client configuration

use std::{env, time::Duration};

use url::Url;

use crate::{protocol::error::A2AError, service::request::DEFAULT_TIMEOUT};

/// Environment variable holding the agent endpoint
pub const AGENT_URL_ENV: &str = "A2A_AGENT_URL";

/// Environment variable holding the signing secret
pub const SECRET_ENV: &str = "A2A_SECRET";

/// Environment variable overriding the token user context
pub const USER_CONTEXT_ENV: &str = "A2A_USER_CONTEXT";

/// User context embedded in tokens when none is configured
pub const DEFAULT_USER_CONTEXT: &str = "a2a-delegate-client";

/// Configuration for an A2A client
#[derive(Clone)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the agent
    pub agent_url: Url,

    /// Shared HMAC secret used to sign bearer tokens
    pub secret: String,

    /// User label carried in the token claims
    pub user_context: String,

    /// Deadline for `tasks/send` and `tasks/get`
    pub timeout: Duration,

    /// Deadline for a whole subscription; `None` waits indefinitely
    pub stream_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new client configuration
    ///
    /// Fails with [`A2AError::Configuration`] when the URL is empty or invalid, or
    /// the secret is empty.
    pub fn new(agent_url: &str, secret: impl Into<String>) -> Result<Self, A2AError> {
        if agent_url.trim().is_empty() {
            return Err(A2AError::Configuration("A2A agent URL must not be empty".into()));
        }
        let agent_url = Url::parse(agent_url.trim()).map_err(|e| {
            A2AError::Configuration(format!("Invalid A2A agent URL '{}': {}", agent_url, e))
        })?;

        let config = Self {
            agent_url,
            secret: secret.into(),
            user_context: DEFAULT_USER_CONTEXT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            stream_timeout: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read the configuration from `A2A_AGENT_URL`, `A2A_SECRET` and the optional
    /// `A2A_USER_CONTEXT`
    pub fn from_env() -> Result<Self, A2AError> {
        let agent_url = require_env(AGENT_URL_ENV)?;
        let secret = require_env(SECRET_ENV)?;

        let mut config = Self::new(&agent_url, secret)?;
        if let Ok(user_context) = env::var(USER_CONTEXT_ENV) {
            if !user_context.is_empty() {
                config.user_context = user_context;
            }
        }
        Ok(config)
    }

    /// Set the user context
    pub fn with_user_context(mut self, user_context: impl Into<String>) -> Self {
        self.user_context = user_context.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the subscription timeout
    pub fn with_stream_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stream_timeout = timeout;
        self
    }

    /// Check the invariants a client needs before it can be built
    pub fn validate(&self) -> Result<(), A2AError> {
        if self.secret.is_empty() {
            return Err(A2AError::Configuration("A2A secret must not be empty".into()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("agent_url", &self.agent_url.as_str())
            .field("secret", &"<redacted>")
            .field("user_context", &self.user_context)
            .field("timeout", &self.timeout)
            .field("stream_timeout", &self.stream_timeout)
            .finish()
    }
}

fn require_env(name: &str) -> Result<String, A2AError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(A2AError::Configuration(format!(
            "Environment variable {} must be set",
            name
        ))),
    }
}
