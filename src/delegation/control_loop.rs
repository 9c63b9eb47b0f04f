//! The ask-model / delegate cycle

use tracing::{debug, info, warn};

use crate::{
    client::{new_session_id, new_task_id},
    protocol::{error::A2AError, Message},
    stream::{StreamAccumulator, StreamOutcome},
};

use super::{LanguageModel, TaskDelegate, DELEGATION_MARKER, RESULT_PREFIX, SYSTEM_PROMPT};

/// Extract the delegation query from a model reply
///
/// Returns `None` unless the reply starts with [`DELEGATION_MARKER`] followed by a
/// non-blank query. The query is trimmed.
pub fn delegation_query(reply: &str) -> Option<String> {
    let query = reply.strip_prefix(DELEGATION_MARKER)?.trim();
    (!query.is_empty()).then(|| query.to_string())
}

/// Result of one run of the loop
#[derive(Debug)]
pub struct DelegationOutcome {
    /// Every message of the run: the user query, model replies and the system
    /// messages carrying delegation results or errors
    pub conversation: Vec<Message>,

    /// The model's final answer, or the error that stopped the loop
    pub result: Result<String, A2AError>,

    /// Number of delegations performed
    pub rounds: usize,
}

impl DelegationOutcome {
    /// The final answer, if the run succeeded
    pub fn answer(&self) -> Option<&str> {
        self.result.as_deref().ok()
    }
}

/// Drives a conversation between a model and a remote agent
///
/// Strictly sequential: at most one model call or one delegation is outstanding.
/// Rounds are unbounded unless capped with [`with_max_rounds`](Self::with_max_rounds).
pub struct DelegationLoop<M, D> {
    model: M,
    delegate: D,
    max_rounds: Option<usize>,
}

impl<M, D> DelegationLoop<M, D>
where
    M: LanguageModel,
    D: TaskDelegate,
{
    pub fn new(model: M, delegate: D) -> Self {
        Self {
            model,
            delegate,
            max_rounds: None,
        }
    }

    /// Fail with [`A2AError::Delegation`] instead of delegating more than `rounds` times
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    /// Answer `query`, delegating to the remote agent as often as the model asks
    pub async fn run(&mut self, query: impl Into<String>) -> DelegationOutcome {
        let mut conversation = vec![Message::user(query)];
        let mut rounds = 0;

        let result = loop {
            let reply = match self.ask_model(&conversation, rounds == 0).await {
                Ok(reply) => reply,
                Err(e) => break Err(e),
            };
            let text = reply.text();
            conversation.push(reply);

            let Some(query) = delegation_query(&text) else {
                debug!("model answered without delegating");
                break Ok(text);
            };

            if let Some(max) = self.max_rounds {
                if rounds >= max {
                    warn!(max_rounds = max, "delegation round limit reached");
                    break Err(A2AError::Delegation(format!(
                        "Delegation round limit of {} reached",
                        max
                    )));
                }
            }
            rounds += 1;

            match self.hand_off(query).await {
                StreamOutcome::Failed(message) => {
                    conversation.push(Message::system(format!(
                        "Error during A2A streaming: {}",
                        message
                    )));
                    break Err(A2AError::Delegation(message));
                }
                outcome => {
                    conversation.push(Message::system(format!("{} {}", RESULT_PREFIX, outcome)));
                }
            }
        };

        DelegationOutcome {
            conversation,
            result,
            rounds,
        }
    }

    async fn ask_model(
        &self,
        conversation: &[Message],
        first: bool,
    ) -> Result<Message, A2AError> {
        if !first {
            return self.model.complete(conversation).await;
        }

        let mut prompt = Vec::with_capacity(conversation.len() + 1);
        prompt.push(Message::system(SYSTEM_PROMPT));
        prompt.extend_from_slice(conversation);
        self.model.complete(&prompt).await
    }

    async fn hand_off(&mut self, query: String) -> StreamOutcome {
        let task_id = new_task_id();
        let session_id = new_session_id();
        info!(%task_id, %session_id, %query, "delegating to A2A agent");

        let outcome = match self
            .delegate
            .send_subscribe_task(task_id, query, Some(session_id))
            .await
        {
            Ok(stream) => StreamAccumulator::accumulate(stream).await,
            Err(e) => {
                let mut accumulator = StreamAccumulator::new();
                accumulator.fail(&e);
                accumulator.finish()
            }
        };

        info!(failed = outcome.is_error(), "delegation finished");
        outcome
    }
}
