//! Bearer token issuance for agent requests
//!
//! Tokens are HS256 JWTs carrying `{context: {user}, exp}`. A token is minted once
//! per constructed client and is never refreshed, so sessions that outlive
//! [`DEFAULT_VALIDITY_SECS`] start failing authentication.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::protocol::error::A2AError;

/// Validity window of an issued token, in seconds
pub const DEFAULT_VALIDITY_SECS: i64 = 3600;

/// User context embedded in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user: String,
}

/// Signed claim set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub context: UserContext,
    /// Expiration, unix seconds
    pub exp: i64,
}

/// An issued bearer token together with the claims it was signed from
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
    pub claims: Claims,
}

impl AuthToken {
    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Issues and verifies tokens for one shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    user_context: String,
    validity: Duration,
}

impl TokenIssuer {
    /// Create an issuer; an empty secret is a configuration error
    pub fn new(
        secret: impl Into<String>,
        user_context: impl Into<String>,
    ) -> Result<Self, A2AError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(A2AError::Configuration("A2A secret must not be empty".into()));
        }

        Ok(Self {
            secret,
            user_context: user_context.into(),
            validity: Duration::seconds(DEFAULT_VALIDITY_SECS),
        })
    }

    /// Override the validity window
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Sign a fresh token; every call produces a new expiry
    pub fn issue(&self) -> Result<AuthToken, A2AError> {
        let claims = Claims {
            context: UserContext {
                user: self.user_context.clone(),
            },
            exp: (Utc::now() + self.validity).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(AuthToken { token, claims })
    }

    /// Decode a token signed with this issuer's secret, checking its expiry
    pub fn verify(&self, token: &str) -> Result<Claims, A2AError> {
        let token_data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("user_context", &self.user_context)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

/// Issue a token valid for one hour
pub fn issue(secret: &str, user_context: &str) -> Result<AuthToken, A2AError> {
    TokenIssuer::new(secret, user_context)?.issue()
}

/// Standard headers for a request authenticated with `token`
pub fn headers(token: &AuthToken) -> HashMap<String, String> {
    HashMap::from([
        ("Authorization".to_string(), token.bearer()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}
