//! Runs the delegation loop with a canned model
//!
//! The model delegates the first question it sees and then reports whatever the
//! agent returned. Point `A2A_AGENT_URL` and `A2A_SECRET` at a running agent.
//!
//! ```text
//! cargo run --example delegation -- "How many orders shipped yesterday?"
//! ```

use std::env;

use a2a_delegate::{delegation::RESULT_PREFIX, prelude::*};
use async_trait::async_trait;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Delegates once, then echoes the delegated result as its answer
struct CannedModel;

#[async_trait]
impl LanguageModel for CannedModel {
    async fn complete(&self, conversation: &[Message]) -> Result<Message, A2AError> {
        let last = conversation
            .last()
            .ok_or_else(|| A2AError::Model("empty conversation".into()))?;

        let reply = match last.role {
            Role::User => format!("DELEGATE_A2A: {}", last.text()),
            _ => {
                let result = last.text();
                let result = result.strip_prefix(RESULT_PREFIX).unwrap_or(&result).trim();
                format!("The agent says: {result}")
            }
        };
        info!(%reply, "canned model reply");
        Ok(Message::agent(reply))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let query = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let query = if query.is_empty() {
        "How many orders shipped yesterday?".to_string()
    } else {
        query
    };

    let client = A2AClientBuilder::from_config(ClientConfig::from_env()?).build()?;
    let mut delegation = DelegationLoop::new(CannedModel, client).with_max_rounds(3);

    let outcome = delegation.run(query).await;
    for message in &outcome.conversation {
        println!("{:?}: {}", message.role, message.text());
    }
    println!("\nDelegations: {}", outcome.rounds);

    let answer = outcome.result?;
    println!("Answer: {answer}");
    Ok(())
}
