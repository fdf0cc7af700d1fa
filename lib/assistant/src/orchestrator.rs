//! The single-turn conversation state machine.
//!
//! One turn: cancel anything still running on the thread, start a run
//! with the user's message, then alternate between the provider and
//! the tool dispatcher until the run completes. Tool rounds are capped;
//! a run that keeps demanding tools past the cap fails the turn rather
//! than looping.

use crate::dispatcher::ToolDispatcher;
use crate::error::OrchestratorError;
use chrono::{DateTime, Utc};
use datebook_calendar::{CalendarGateway, CredentialSource};
use datebook_core::UserId;
use datebook_provider::{
    CompletionProvider, RunId, RunState, RunStatus, ThreadId, ToolCall, ToolCallId,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// What a single provider step produced: either the turn's final text
/// or a tool call the assistant must service before continuing.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutput {
    /// The run completed with assistant text.
    Final(String),
    /// The run is blocked on a tool call.
    PendingTool {
        /// The run awaiting the tool result.
        run_id: RunId,
        /// The tool call to answer.
        tool_call_id: ToolCallId,
        /// The requested tool invocation.
        call: ToolCall,
    },
}

impl TurnOutput {
    /// Classifies a run state, extracting the first pending tool call
    /// when the run requires action.
    ///
    /// # Errors
    ///
    /// Returns `RunFailed` for terminal non-completed runs and
    /// `NoPendingToolCall` when a run requires action but carries no
    /// pending calls.
    pub fn from_state(state: RunState) -> Result<Self, OrchestratorError> {
        match state {
            RunState::Completed { text } => Ok(Self::Final(text)),
            RunState::RequiresAction { run_id, pending } => {
                let mut pending = pending.into_iter();
                let Some(first) = pending.next() else {
                    return Err(OrchestratorError::NoPendingToolCall { run_id });
                };
                let ignored = pending.len();
                if ignored > 0 {
                    warn!(run_id = %run_id, ignored, "servicing only the first pending tool call");
                }
                Ok(Self::PendingTool {
                    run_id,
                    tool_call_id: first.id,
                    call: first.call,
                })
            }
            RunState::Failed { status } => Err(OrchestratorError::RunFailed { status }),
        }
    }
}

/// Drives one conversational turn to completion.
pub struct ConversationOrchestrator<P, G, C> {
    provider: Arc<P>,
    dispatcher: ToolDispatcher<G, C>,
    max_tool_rounds: u32,
}

impl<P, G, C> ConversationOrchestrator<P, G, C>
where
    P: CompletionProvider,
    G: CalendarGateway,
    C: CredentialSource,
{
    /// Creates an orchestrator over a provider and tool dispatcher.
    #[must_use]
    pub fn new(provider: Arc<P>, dispatcher: ToolDispatcher<G, C>, max_tool_rounds: u32) -> Self {
        Self {
            provider,
            dispatcher,
            max_tool_rounds,
        }
    }

    /// Runs one turn on the thread and returns the final assistant
    /// text.
    ///
    /// `context` is ephemeral run-scoped grounding; it is attached to
    /// this run only and never persisted into the thread. `now` is the
    /// reference instant for tool-side time resolution.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider fails, a tool fails, the run
    /// ends in a non-completed terminal state, or the tool-round cap
    /// is exceeded.
    #[instrument(skip(self, message, context), fields(user_id = %user_id, thread_id = %thread_id))]
    pub async fn handle_message(
        &self,
        user_id: UserId,
        thread_id: &ThreadId,
        message: &str,
        context: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String, OrchestratorError> {
        self.provider
            .cancel_active_runs(thread_id, &RunStatus::INTERRUPTIBLE)
            .await?;

        let mut state = self.provider.start_run(thread_id, message, context).await?;
        for round in 0..self.max_tool_rounds {
            let (run_id, tool_call_id, call) = match TurnOutput::from_state(state)? {
                TurnOutput::Final(text) => return Ok(text),
                TurnOutput::PendingTool {
                    run_id,
                    tool_call_id,
                    call,
                } => (run_id, tool_call_id, call),
            };
            debug!(round, tool = %call.name, "servicing tool call");
            let result = self.dispatcher.dispatch(user_id, &call, now).await?;
            state = self
                .provider
                .submit_tool_result(thread_id, &run_id, &tool_call_id, &result)
                .await?;
        }

        match TurnOutput::from_state(state)? {
            TurnOutput::Final(text) => Ok(text),
            TurnOutput::PendingTool { .. } => Err(OrchestratorError::ToolRoundsExceeded {
                max: self.max_tool_rounds,
            }),
        }
    }
}
