//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower::ServiceBuilder;
use tracing::info;
use url::Url;

use crate::{
    auth::TokenIssuer,
    client::{
        config::{ClientConfig, DEFAULT_USER_CONTEXT},
        TaskClient,
    },
    codec::{Codec, JsonRpcCodec},
    layer::{A2AValidationLayer, A2AValidationService, AuthLayer, AuthService},
    protocol::error::A2AError,
    service::{request::DEFAULT_TIMEOUT, A2AProtocolService},
    transport::{HttpTransport, Transport},
};

/// The service stack assembled by [`A2AClientBuilder::build`]
pub type A2AStack<T> = AuthService<A2AValidationService<A2AProtocolService<T>>>;

/// Builder for constructing A2A clients
///
/// This builder provides a fluent API for configuring and building an A2A client
/// with customizable transport, codec, credentials and timeouts.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_delegate::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "http://localhost:8000/a2a".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url)
///     .with_secret("shared-secret")
///     .with_timeout(Duration::from_secs(60))
///     .build()?;
///
/// let task = client.get_task("task-1").await?;
/// println!("{:?}", task.status.state);
/// # Ok(())
/// # }
/// ```
///
/// # Compiler Error
/// This will fail to compile if it is not clear to the compiler which type implementing
/// `Transport` is being used as underlying transport. This is expected behaviour.
///
/// ```compile_fail
/// let client = a2a_delegate::client::A2AClientBuilder::new(agent_url()).build();
/// ```
pub struct A2AClientBuilder<T: Transport> {
    agent_url: Url,
    transport: Result<Option<T>, A2AError>,
    codec: Option<Arc<dyn Codec>>,
    secret: String,
    user_context: String,
    timeout: Duration,
    stream_timeout: Option<Duration>,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Start a builder for `agent_url`; a transport must be supplied with
    /// [`with_transport`](Self::with_transport)
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url,
            transport: Ok(None),
            codec: None,
            secret: String::new(),
            user_context: DEFAULT_USER_CONTEXT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            stream_timeout: None,
        }
    }

    /// Use a custom transport
    ///
    /// # Arguments
    ///
    /// * `transport` - The transport implementation to use
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Ok(Some(transport));
        self
    }

    /// Use a custom codec
    ///
    /// # Arguments
    ///
    /// * `codec` - The codec implementation to use
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the shared secret used to sign the bearer token
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Set the user context carried in the token claims
    pub fn with_user_context(mut self, user_context: impl Into<String>) -> Self {
        self.user_context = user_context.into();
        self
    }

    /// Set the timeout for `tasks/send` and `tasks/get`
    ///
    /// # Arguments
    ///
    /// * `timeout` - The timeout duration for requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bound the duration of subscriptions (unbounded by default)
    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = Some(timeout);
        self
    }

    /// Build the A2A client
    ///
    /// This issues the bearer token, assembles the Tower layers and returns a
    /// configured client. The token is issued once and reused for every request
    /// made by the client.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::Configuration`] if:
    /// - No transport has been configured
    /// - The secret is empty
    pub fn build(self) -> Result<TaskClient<A2AStack<T>>, A2AError> {
        let transport = self.transport?.ok_or_else(|| {
            A2AError::Configuration(
                "Transport not configured. Call new_http() or with_transport()".into(),
            )
        })?;

        let config = ClientConfig {
            agent_url: self.agent_url,
            secret: self.secret,
            user_context: self.user_context,
            timeout: self.timeout,
            stream_timeout: self.stream_timeout,
        };
        config.validate()?;

        let token = TokenIssuer::new(config.secret.clone(), config.user_context.clone())?.issue()?;
        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonRpcCodec));

        let service = ServiceBuilder::new()
            .layer(AuthLayer::new(token))
            .layer(A2AValidationLayer::new())
            .service(A2AProtocolService::new(transport, codec));

        info!(
            agent_url = %config.agent_url,
            user_context = %config.user_context,
            "built A2A task client"
        );
        Ok(TaskClient::new(service, config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a new client builder with HTTP transport
    ///
    /// # Arguments
    ///
    /// * `agent_url` - The agent's JSON-RPC endpoint (e.g., "<http://localhost:8000/a2a>")
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone()).map(Some);
        Self {
            transport,
            codec: Some(Arc::new(JsonRpcCodec)),
            ..Self::new(agent_url)
        }
    }

    /// Create an HTTP client builder from a configuration
    pub fn from_config(config: ClientConfig) -> Self {
        let mut builder = Self::new_http(config.agent_url)
            .with_secret(config.secret)
            .with_user_context(config.user_context)
            .with_timeout(config.timeout);
        builder.stream_timeout = config.stream_timeout;
        builder
    }
}
