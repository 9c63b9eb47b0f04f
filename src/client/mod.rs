//! High-level client API for A2A task delegation

pub mod agent;
pub mod blocking;
pub mod builder;
pub mod config;

pub use agent::{new_session_id, new_task_id, TaskClient};
pub use blocking::BlockingTaskClient;
pub use builder::{A2AClientBuilder, A2AStack};
pub use config::ClientConfig;
