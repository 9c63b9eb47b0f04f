//! Tower Layer implementations for A2A protocol

pub mod auth;
pub mod validation;

pub use auth::{AuthLayer, AuthService};
pub use validation::{A2AValidationLayer, A2AValidationService};
