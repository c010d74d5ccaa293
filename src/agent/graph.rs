//! The travel planning workflow.
//!
//! One thread moves through a small state machine: decisions alternate with
//! tool batches until the model produces a plan with no tool calls, then the
//! thread parks at `AwaitingApproval`. Delivery only ever happens through an
//! explicit `resume` call carrying the email parameters, which drives the
//! thread to `Done`. Every completed node commits a checkpoint, so a failed
//! node can be retried without duplicating history.

use super::{decision, executor, mailer};
use crate::checkpoint::{Checkpoint, CheckpointError, CheckpointStore, RunPhase};
use crate::config::Config;
use crate::conversation::{ConversationState, Message};
use crate::llm::{LlmClient, LlmError, OllamaClient};
use crate::mail::{EmailProvider, SendGridMailer};
use crate::tools::ToolRegistry;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// What a caller gets back from every entry point: the thread's committed
/// position and conversation.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub thread_id: String,
    pub phase: RunPhase,
    pub state: ConversationState,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("no final plan after {limit} decision steps")]
    DecisionLimitReached { limit: usize },

    #[error("unknown thread: {0}")]
    UnknownThread(String),

    #[error("thread {thread_id} is not awaiting approval (currently {phase:?})")]
    NotAwaitingApproval {
        thread_id: String,
        phase: RunPhase,
    },

    #[error("from_email, to_email and email_subject must all be non-empty")]
    MissingDeliveryParams,

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

/// The workflow engine. Capabilities are injected so tests can script the
/// model, the tools and the mail provider.
pub struct TravelAgent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    mailer: Arc<dyn EmailProvider>,
    checkpoints: Arc<dyn CheckpointStore>,
    max_decision_steps: usize,
    parallel_tools: bool,
}

impl TravelAgent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        mailer: Arc<dyn EmailProvider>,
        checkpoints: Arc<dyn CheckpointStore>,
        max_decision_steps: usize,
        parallel_tools: bool,
    ) -> Self {
        Self {
            llm,
            tools,
            mailer,
            checkpoints,
            max_decision_steps,
            parallel_tools,
        }
    }

    /// Wire the production stack: Ollama, the SerpAPI tools, SendGrid and
    /// an in-memory checkpoint store.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm = OllamaClient::new(
            &config.ollama_url,
            &config.agent_model,
            config.model_timeout,
        )?;
        let mailer = SendGridMailer::new(&config.sendgrid_api_key)?;
        Ok(Self::new(
            Arc::new(llm),
            ToolRegistry::default_tools(config),
            Arc::new(mailer),
            Arc::new(crate::checkpoint::InMemoryCheckpointStore::new()),
            config.max_decision_steps,
            config.parallel_tools,
        ))
    }

    /// Run a thread from its query to the approval interrupt.
    ///
    /// A new thread appends the query as its first entry. For a thread that
    /// already exists this is a retry: execution continues from the last
    /// committed node and the query argument is ignored, so a failed
    /// invocation never duplicates history. A thread already at or past
    /// `AwaitingApproval` is left untouched and its snapshot returned.
    pub async fn start(&self, thread_id: &str, query: &str) -> Result<RunSnapshot, WorkflowError> {
        let (state, phase) = match self.checkpoints.load(thread_id).await? {
            None => {
                tracing::info!(thread_id, "starting travel planning thread");
                let mut state = ConversationState::new();
                state.append(Message::human(query));
                self.commit(thread_id, RunPhase::Deciding, &state).await?;
                (state, RunPhase::Deciding)
            }
            Some(checkpoint) => match checkpoint.phase {
                RunPhase::Deciding | RunPhase::AwaitingToolResults => {
                    tracing::info!(
                        thread_id,
                        phase = ?checkpoint.phase,
                        "retrying thread from last committed node"
                    );
                    (checkpoint.state, checkpoint.phase)
                }
                phase => {
                    tracing::debug!(thread_id, ?phase, "start is a no-op for a settled thread");
                    return Ok(self.snapshot(thread_id, phase, checkpoint.state));
                }
            },
        };

        self.drive_to_interrupt(thread_id, state, phase).await
    }

    /// Deliver an approved plan by email and close the thread.
    ///
    /// Valid only from `AwaitingApproval` with three non-empty parameters.
    /// Composition and delivery failures are contained in the terminal
    /// message; the thread reaches `Done` either way. The transient
    /// `Sending` phase is never persisted, so a crash mid-send leaves the
    /// thread approvable again.
    pub async fn resume(
        &self,
        thread_id: &str,
        from_email: &str,
        to_email: &str,
        email_subject: &str,
    ) -> Result<RunSnapshot, WorkflowError> {
        if [from_email, to_email, email_subject]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return Err(WorkflowError::MissingDeliveryParams);
        }

        let checkpoint = self
            .checkpoints
            .load(thread_id)
            .await?
            .ok_or_else(|| WorkflowError::UnknownThread(thread_id.to_string()))?;
        if checkpoint.phase != RunPhase::AwaitingApproval {
            return Err(WorkflowError::NotAwaitingApproval {
                thread_id: thread_id.to_string(),
                phase: checkpoint.phase,
            });
        }

        let mut state = checkpoint.state;
        state.set_delivery(from_email, to_email, email_subject);

        tracing::info!(
            thread_id,
            phase = ?RunPhase::Sending,
            to = to_email,
            "approval received, delivering plan"
        );
        let plan = state
            .last_message()
            .map(Message::content)
            .unwrap_or_default()
            .to_string();
        let terminal = mailer::compose_and_send(
            self.llm.as_ref(),
            self.mailer.as_ref(),
            &plan,
            from_email,
            to_email,
            email_subject,
        )
        .await;
        state.append(terminal);
        self.commit(thread_id, RunPhase::Done, &state).await?;

        Ok(self.snapshot(thread_id, RunPhase::Done, state))
    }

    /// The committed snapshot of a thread.
    pub async fn inspect(&self, thread_id: &str) -> Result<RunSnapshot, WorkflowError> {
        let checkpoint = self
            .checkpoints
            .load(thread_id)
            .await?
            .ok_or_else(|| WorkflowError::UnknownThread(thread_id.to_string()))?;
        Ok(self.snapshot(thread_id, checkpoint.phase, checkpoint.state))
    }

    /// Drop a thread's checkpoint. Returns whether one existed.
    pub async fn delete_thread(&self, thread_id: &str) -> Result<bool, WorkflowError> {
        Ok(self.checkpoints.delete(thread_id).await?)
    }

    async fn drive_to_interrupt(
        &self,
        thread_id: &str,
        mut state: ConversationState,
        mut phase: RunPhase,
    ) -> Result<RunSnapshot, WorkflowError> {
        let schemas = self.tools.schemas();
        let mut decisions_taken = 0usize;

        loop {
            match phase {
                RunPhase::Deciding => {
                    if decisions_taken >= self.max_decision_steps {
                        tracing::warn!(
                            thread_id,
                            limit = self.max_decision_steps,
                            "decision limit reached without a final plan"
                        );
                        return Err(WorkflowError::DecisionLimitReached {
                            limit: self.max_decision_steps,
                        });
                    }
                    let decision =
                        decision::take_decision(self.llm.as_ref(), &schemas, &state).await?;
                    decisions_taken += 1;
                    phase = branch_after_decision(&decision);
                    state.append(decision);
                    self.commit(thread_id, phase, &state).await?;
                }
                RunPhase::AwaitingToolResults => {
                    let calls = state.pending_tool_calls().to_vec();
                    let results =
                        executor::run_tool_batch(&self.tools, &calls, self.parallel_tools).await;
                    state.append_all(results);
                    phase = RunPhase::Deciding;
                    self.commit(thread_id, phase, &state).await?;
                }
                _ => {
                    tracing::info!(thread_id, "plan ready, awaiting approval");
                    return Ok(self.snapshot(thread_id, phase, state));
                }
            }
        }
    }

    async fn commit(
        &self,
        thread_id: &str,
        phase: RunPhase,
        state: &ConversationState,
    ) -> Result<(), CheckpointError> {
        self.checkpoints
            .save(thread_id, Checkpoint::new(phase, state.clone()))
            .await
    }

    fn snapshot(&self, thread_id: &str, phase: RunPhase, state: ConversationState) -> RunSnapshot {
        RunSnapshot {
            thread_id: thread_id.to_string(),
            phase,
            state,
        }
    }
}

/// Route after a decision: requested tools mean another executor pass, no
/// tools mean the plan is final and the thread parks for approval.
fn branch_after_decision(decision: &Message) -> RunPhase {
    if decision.tool_calls().is_empty() {
        RunPhase::AwaitingApproval
    } else {
        RunPhase::AwaitingToolResults
    }
}
