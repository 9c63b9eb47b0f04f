//! Talks to an A2A agent from the command line
//!
//! ```text
//! A2A_AGENT_URL=http://localhost:8000/a2a A2A_SECRET=... \
//!     cargo run --example task_client -- send "What was Q3 revenue?"
//! cargo run --example task_client -- subscribe "What was Q3 revenue?"
//! cargo run --example task_client -- get <task-id>
//! ```

use std::env;

use a2a_delegate::prelude::*;
use anyhow::{bail, Context};
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "send".to_string());
    let argument = args.collect::<Vec<_>>().join(" ");

    let config = ClientConfig::from_env().context("A2A client configuration")?;
    println!("Agent: {}", config.agent_url);
    let mut client = A2AClientBuilder::from_config(config).build()?;

    match command.as_str() {
        "send" => {
            let task_id = new_task_id();
            let task = client.send_task(task_id, query_or_default(argument), None).await?;
            println!("Task {} is {:?}", task.id, task.status.state);
            match task.render_text() {
                Ok(text) => println!("{text}"),
                Err(e) => println!("Could not render task: {e}"),
            }
        }
        "subscribe" => {
            let mut stream = client
                .send_subscribe_task(new_task_id(), query_or_default(argument), None)
                .await?;

            let mut accumulator = StreamAccumulator::new();
            while let Some(item) = stream.next().await {
                match item {
                    Ok(event) => {
                        println!("[{:?}] {}", event.kind, event.data);
                        if accumulator.push(&event).is_break() {
                            break;
                        }
                    }
                    Err(e) => {
                        accumulator.fail(&e);
                        break;
                    }
                }
            }

            match accumulator.finish() {
                StreamOutcome::Failed(message) => bail!(message),
                outcome => println!("\nResult:\n{outcome}"),
            }
        }
        "get" => {
            if argument.is_empty() {
                bail!("usage: task_client get <task-id>");
            }
            let task = client.get_task(argument).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        other => bail!("unknown command '{other}', expected send, subscribe or get"),
    }

    Ok(())
}

fn query_or_default(argument: String) -> String {
    if argument.is_empty() {
        "What were the sales figures last month?".to_string()
    } else {
        argument
    }
}
