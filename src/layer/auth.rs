//! Authentication layer for A2A protocol

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    auth::{self, AuthToken},
    protocol::error::A2AError,
    service::{A2ARequest, A2AResponse},
};

/// Authentication layer
///
/// Attaches the headers of one issued token to every request. The token is
/// fixed for the lifetime of the layer.
#[derive(Clone, Debug)]
pub struct AuthLayer {
    token: AuthToken,
}

impl AuthLayer {
    /// Create a new authentication layer
    pub fn new(token: AuthToken) -> Self {
        Self { token }
    }

    /// The token attached to requests
    pub fn token(&self) -> &AuthToken {
        &self.token
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            token: self.token.clone(),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    token: AuthToken,
}

impl<S> Service<A2ARequest> for AuthService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: A2ARequest) -> Self::Future {
        req.context.headers.extend(auth::headers(&self.token));

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
