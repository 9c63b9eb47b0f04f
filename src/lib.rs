//! # A2A Delegate
//!
//! A Tower-based client for delegating tasks to a remote Agent2Agent (A2A) agent.
//!
//! The agent is reached over JSON-RPC 2.0 on a single HTTP endpoint and supports
//! three operations: `tasks/send` (submit and wait), `tasks/sendSubscribe` (submit
//! and stream updates over SSE) and `tasks/get` (fetch by id). Requests carry an
//! HS256 bearer token minted from a shared secret.
//!
//! ## Features
//!
//! - **Composable Middleware**: Auth and validation as Tower layers
//! - **Async and Blocking**: Every operation has a synchronous variant
//! - **Stream Accumulation**: Folds SSE task updates into one result text
//! - **Delegation Loop**: Lets a language model hand queries to the agent
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_delegate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://localhost:8000/a2a", "shared-secret")?;
//!     let mut client = A2AClientBuilder::from_config(config).build()?;
//!
//!     let stream = client
//!         .send_subscribe_task(new_task_id(), "Summarize Q3 revenue", None)
//!         .await?;
//!     let outcome = StreamAccumulator::accumulate(stream).await;
//!     println!("{}", outcome.into_result()?);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod codec;
pub mod delegation;
pub mod layer;
pub mod protocol;
pub mod service;
pub mod stream;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{
            new_session_id, new_task_id, A2AClientBuilder, BlockingTaskClient, ClientConfig,
            TaskClient,
        },
        codec::{EventKind, EventStream, StreamEvent},
        delegation::{DelegationLoop, DelegationOutcome, LanguageModel, TaskDelegate},
        protocol::error::A2AError,
        protocol::{Artifact, Message, Part, PartContent, Role, Task, TaskState, TaskStatus},
        stream::{StreamAccumulator, StreamOutcome},
    };
}
