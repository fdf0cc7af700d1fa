//! The top-level entry point for one conversational turn.
//!
//! The runner resolves the user's session, builds the ephemeral
//! runtime context, and delegates to the orchestrator. It is the
//! error boundary of the assistant: every failure below it is logged
//! and converted to a static fallback reply, so callers always get
//! text back.

use crate::context::build_runtime_context;
use crate::error::{OrchestratorError, SessionError};
use crate::orchestrator::ConversationOrchestrator;
use crate::session::{SessionManager, SessionStore};
use std::fmt;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use datebook_calendar::{CalendarGateway, CredentialSource};
use datebook_core::UserId;
use datebook_provider::CompletionProvider;
use tracing::{error, instrument};

/// The assistant's reply to one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    /// Final assistant text.
    pub text: String,
}

/// Runs complete conversational turns, never surfacing errors.
pub struct AssistantRunner<S, P, G, C> {
    sessions: SessionManager<S, P>,
    orchestrator: ConversationOrchestrator<P, G, C>,
    zone: Tz,
    fallback_text: String,
}

impl<S, P, G, C> AssistantRunner<S, P, G, C>
where
    S: SessionStore,
    P: CompletionProvider,
    G: CalendarGateway,
    C: CredentialSource,
{
    /// Creates a runner over a session manager and orchestrator.
    #[must_use]
    pub fn new(
        sessions: SessionManager<S, P>,
        orchestrator: ConversationOrchestrator<P, G, C>,
        zone: Tz,
        fallback_text: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            orchestrator,
            zone,
            fallback_text: fallback_text.into(),
        }
    }

    /// Handles one user message and returns the assistant's reply.
    ///
    /// Never returns an error: any failure in session resolution,
    /// orchestration, or tool execution is logged and replaced with
    /// the configured fallback text.
    pub async fn run(&self, user_id: UserId, message: &str) -> AssistantReply {
        self.run_at(user_id, message, Utc::now()).await
    }

    #[instrument(skip(self, message), fields(user_id = %user_id))]
    async fn run_at(&self, user_id: UserId, message: &str, now: DateTime<Utc>) -> AssistantReply {
        match self.turn(user_id, message, now).await {
            Ok(text) => AssistantReply { text },
            Err(e) => {
                error!(error = %e, "turn failed, replying with fallback");
                AssistantReply {
                    text: self.fallback_text.clone(),
                }
            }
        }
    }

    async fn turn(
        &self,
        user_id: UserId,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TurnError> {
        let session = self.sessions.get_or_create(user_id).await?;
        let context = build_runtime_context(now, self.zone);
        let text = self
            .orchestrator
            .handle_message(user_id, &session.thread_id, message, Some(&context), now)
            .await?;
        Ok(text)
    }
}

/// Anything that can abort a turn before final text is produced.
#[derive(Debug)]
enum TurnError {
    Session(SessionError),
    Orchestrator(OrchestratorError),
}

impl From<SessionError> for TurnError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<OrchestratorError> for TurnError {
    fn from(e: OrchestratorError) -> Self {
        Self::Orchestrator(e)
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(e) => write!(f, "session resolution failed: {e}"),
            Self::Orchestrator(e) => write!(f, "orchestration failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::ToolDispatcher;
    use crate::test_support::{
        MemorySessionStore, RecordingGateway, ScriptedProvider, StaticCredentials,
    };
    use chrono::TimeZone;
    use datebook_provider::{PendingToolCall, RunState, RunStatus, ToolCall, ToolCallId};
    use serde_json::json;
    use std::sync::Arc;

    const FALLBACK: &str = "Sorry, something went wrong while processing your request.";

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 26, 10, 0, 0).unwrap()
    }

    fn runner(
        provider: Arc<ScriptedProvider>,
        gateway: RecordingGateway,
    ) -> AssistantRunner<MemorySessionStore, ScriptedProvider, RecordingGateway, StaticCredentials>
    {
        let sessions = SessionManager::new(MemorySessionStore::default(), provider.clone());
        let dispatcher =
            ToolDispatcher::new(gateway, StaticCredentials::new("tok"), chrono_tz::UTC, 60);
        let orchestrator = ConversationOrchestrator::new(provider, dispatcher, 5);
        AssistantRunner::new(sessions, orchestrator, chrono_tz::UTC, FALLBACK)
    }

    fn sample_event(id: &str) -> datebook_calendar::Event {
        let start = reference_now() + chrono::Duration::hours(7);
        datebook_calendar::Event {
            id: id.to_string(),
            title: "Meeting".to_string(),
            start,
            end: start + chrono::Duration::hours(1),
            description: None,
            location: None,
            attendees: vec![],
        }
    }

    #[tokio::test]
    async fn plain_turn_returns_assistant_text() {
        let provider = Arc::new(ScriptedProvider::completing("Hi! How can I help?"));
        let runner = runner(provider.clone(), RecordingGateway::default());

        let reply = runner.run(UserId::new(), "hello").await;
        assert_eq!(reply.text, "Hi! How can I help?");
        assert_eq!(provider.threads_created(), 1);
    }

    #[tokio::test]
    async fn consecutive_turns_reuse_the_thread() {
        let provider = Arc::new(ScriptedProvider::completing("ok"));
        let runner = runner(provider.clone(), RecordingGateway::default());
        let user_id = UserId::new();

        runner.run(user_id, "first").await;
        runner.run(user_id, "second").await;
        assert_eq!(provider.threads_created(), 1);
        assert_eq!(provider.started_messages().len(), 2);
    }

    #[tokio::test]
    async fn runtime_context_is_attached_to_the_run() {
        let provider = Arc::new(ScriptedProvider::completing("ok"));
        let runner = runner(provider.clone(), RecordingGateway::default());

        runner
            .run_at(UserId::new(), "hello", reference_now())
            .await;

        let starts = provider.started_messages();
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].0, "hello");
        let context = starts[0].1.as_deref().unwrap();
        assert!(context.contains("Today is 2026-08-26"));
        assert!(context.contains("Timezone: UTC"));
    }

    #[tokio::test]
    async fn tool_turn_runs_end_to_end() {
        let pending = PendingToolCall {
            id: ToolCallId::from("call_1"),
            call: ToolCall::new("delete_event").with_arg("event_id", json!("evt123")),
        };
        let provider = Arc::new(ScriptedProvider::with_states(vec![
            RunState::RequiresAction {
                run_id: "run_1".into(),
                pending: vec![pending],
            },
            RunState::Completed {
                text: "Done, I've cancelled it.".to_string(),
            },
        ]));
        let gateway = RecordingGateway::default().with_events(vec![sample_event("evt123")]);
        let runner = runner(provider.clone(), gateway.clone());

        let reply = runner
            .run_at(UserId::new(), "cancel my 5pm meeting", reference_now())
            .await;

        assert_eq!(reply.text, "Done, I've cancelled it.");
        assert_eq!(gateway.deleted_ids(), vec!["evt123".to_string()]);
        assert_eq!(
            provider.submitted()[0].2,
            json!({"status": "deleted", "event_id": "evt123"})
        );
    }

    #[tokio::test]
    async fn failed_run_falls_back() {
        let provider = Arc::new(ScriptedProvider::with_states(vec![RunState::Failed {
            status: RunStatus::Expired,
        }]));
        let runner = runner(provider, RecordingGateway::default());

        let reply = runner.run(UserId::new(), "hello").await;
        assert_eq!(reply.text, FALLBACK);
    }

    #[tokio::test]
    async fn unknown_tool_falls_back() {
        let pending = PendingToolCall {
            id: ToolCallId::from("call_1"),
            call: ToolCall::new("send_email"),
        };
        let provider = Arc::new(ScriptedProvider::with_states(vec![
            RunState::RequiresAction {
                run_id: "run_1".into(),
                pending: vec![pending],
            },
        ]));
        let runner = runner(provider.clone(), RecordingGateway::default());

        let reply = runner.run(UserId::new(), "email my boss").await;
        assert_eq!(reply.text, FALLBACK);
        assert!(provider.submitted().is_empty());
    }

    #[tokio::test]
    async fn thread_create_failure_falls_back() {
        let provider = Arc::new(ScriptedProvider::failing_thread_create("quota exceeded"));
        let runner = runner(provider, RecordingGateway::default());

        let reply = runner.run(UserId::new(), "hello").await;
        assert_eq!(reply.text, FALLBACK);
    }
}
