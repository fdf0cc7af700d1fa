//! The completion provider trait.

use crate::error::ProviderError;
use crate::run::{RunId, RunState, RunStatus, ThreadId, ToolCallId};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Trait for LLM chat-completion providers that host threads and runs.
///
/// Implementations own all wire-protocol concerns: authentication,
/// message submission, and polling a run to quiescence. Every method
/// here is one synchronous step from the orchestrator's point of view;
/// `start_run` and `submit_tool_result` return only once the run has
/// reached a reportable state (completed, requires_action, or a
/// terminal failure).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Creates a new durable conversation thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    async fn create_thread(&self) -> Result<ThreadId, ProviderError>;

    /// Appends the user message to the thread and starts a run over it.
    ///
    /// `context` is ephemeral run-scoped instruction text; it must not
    /// be persisted into the thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the message or run submission fails.
    async fn start_run(
        &self,
        thread_id: &ThreadId,
        message: &str,
        context: Option<&str>,
    ) -> Result<RunState, ProviderError>;

    /// Submits a tool result to a paused run and advances it.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission is rejected or the run cannot
    /// be polled afterwards.
    async fn submit_tool_result(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
        tool_call_id: &ToolCallId,
        result: &JsonValue,
    ) -> Result<RunState, ProviderError>;

    /// Cancels runs on the thread whose status is in `statuses`.
    ///
    /// Best-effort in the sense of retry-free: implementations may later
    /// add per-thread locking behind this method without changing
    /// callers.
    ///
    /// # Errors
    ///
    /// Returns an error if the run listing or a cancellation fails.
    async fn cancel_active_runs(
        &self,
        thread_id: &ThreadId,
        statuses: &[RunStatus],
    ) -> Result<(), ProviderError>;
}
