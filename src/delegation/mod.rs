//! LLM-driven delegation of queries to a remote A2A agent
//!
//! The loop alternates between asking a [`LanguageModel`] and, whenever the model
//! answers with [`DELEGATION_MARKER`], streaming the query to a [`TaskDelegate`]
//! and feeding the result back as a system message.

pub mod control_loop;
pub mod model;

pub use control_loop::{delegation_query, DelegationLoop, DelegationOutcome};
pub use model::{LanguageModel, TaskDelegate};

/// Reply prefix by which the model requests delegation
pub const DELEGATION_MARKER: &str = "DELEGATE_A2A:";

/// Prefix of the system message carrying a delegated result
pub const RESULT_PREFIX: &str = "A2A Result:";

/// Instruction prepended to the first model call
pub const SYSTEM_PROMPT: &str = "\
You are a helpful assistant answering the user's query.
A remote A2A (Agent-to-Agent) service is available that can look up specific data \
such as metrics, reports or other structured records.

When the query needs data that service can provide, reply with exactly one line:
DELEGATE_A2A: <the query to send to the A2A agent>

For example, for \"What were the sales figures last month?\" reply:
DELEGATE_A2A: Get sales figures for the previous calendar month.

When you can answer directly, just answer.
Information returned by the A2A agent arrives in messages starting with 'A2A Result:'. \
Summarize it and present it clearly to the user.";
