//! Shared test fakes: a scripted completion provider, a recording
//! calendar gateway, a static credential source, and an in-memory
//! session store.

use crate::error::SessionError;
use crate::session::{ConversationSession, SessionStore};
use async_trait::async_trait;
use datebook_calendar::{
    CalendarCredentials, CalendarGateway, CredentialSource, Event, EventCreateCommand, EventPatch,
    GatewayError, TimeWindow,
};
use datebook_core::UserId;
use datebook_provider::{
    CompletionProvider, ProviderError, RunId, RunState, RunStatus, ThreadId, ToolCallId,
};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A provider that replays a scripted sequence of run states and
/// records every call made to it.
pub struct ScriptedProvider {
    states: Mutex<VecDeque<RunState>>,
    repeat: Option<RunState>,
    thread_create_failure: Option<String>,
    threads: AtomicUsize,
    cancels: Mutex<Vec<Vec<RunStatus>>>,
    starts: Mutex<Vec<(String, Option<String>)>>,
    submissions: Mutex<Vec<(RunId, ToolCallId, JsonValue)>>,
}

impl ScriptedProvider {
    fn empty() -> Self {
        Self {
            states: Mutex::new(VecDeque::new()),
            repeat: None,
            thread_create_failure: None,
            threads: AtomicUsize::new(0),
            cancels: Mutex::new(Vec::new()),
            starts: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every run completes with the given text.
    pub fn completing(text: &str) -> Self {
        Self {
            repeat: Some(RunState::Completed {
                text: text.to_string(),
            }),
            ..Self::empty()
        }
    }

    /// A provider replaying the given states in order.
    pub fn with_states(states: Vec<RunState>) -> Self {
        Self {
            states: Mutex::new(states.into()),
            ..Self::empty()
        }
    }

    /// A provider that fails thread creation.
    pub fn failing_thread_create(reason: &str) -> Self {
        Self {
            thread_create_failure: Some(reason.to_string()),
            ..Self::empty()
        }
    }

    pub fn threads_created(&self) -> usize {
        self.threads.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> Vec<Vec<RunStatus>> {
        self.cancels.lock().unwrap().clone()
    }

    pub fn started_messages(&self) -> Vec<(String, Option<String>)> {
        self.starts.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<(RunId, ToolCallId, JsonValue)> {
        self.submissions.lock().unwrap().clone()
    }

    fn next_state(&self) -> RunState {
        if let Some(state) = self.states.lock().unwrap().pop_front() {
            return state;
        }
        self.repeat.clone().expect("run state script exhausted")
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn create_thread(&self) -> Result<ThreadId, ProviderError> {
        if let Some(reason) = &self.thread_create_failure {
            return Err(ProviderError::ThreadCreateFailed {
                reason: reason.clone(),
            });
        }
        let n = self.threads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ThreadId::from(format!("thread_{n}").as_str()))
    }

    async fn start_run(
        &self,
        _thread_id: &ThreadId,
        message: &str,
        context: Option<&str>,
    ) -> Result<RunState, ProviderError> {
        self.starts
            .lock()
            .unwrap()
            .push((message.to_string(), context.map(str::to_string)));
        Ok(self.next_state())
    }

    async fn submit_tool_result(
        &self,
        _thread_id: &ThreadId,
        run_id: &RunId,
        tool_call_id: &ToolCallId,
        result: &JsonValue,
    ) -> Result<RunState, ProviderError> {
        self.submissions
            .lock()
            .unwrap()
            .push((run_id.clone(), tool_call_id.clone(), result.clone()));
        Ok(self.next_state())
    }

    async fn cancel_active_runs(
        &self,
        _thread_id: &ThreadId,
        statuses: &[RunStatus],
    ) -> Result<(), ProviderError> {
        self.cancels.lock().unwrap().push(statuses.to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct GatewayState {
    events: Vec<Event>,
    created: Vec<EventCreateCommand>,
    patches: Vec<(String, EventPatch)>,
    deleted: Vec<String>,
    fail_next: Option<String>,
}

/// A gateway backed by an in-memory event list, recording every write.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl RecordingGateway {
    /// Seeds the gateway with existing events.
    pub fn with_events(self, events: Vec<Event>) -> Self {
        self.state.lock().unwrap().events = events;
        self
    }

    /// Makes the next gateway call fail.
    pub fn fail_next(&self, reason: &str) {
        self.state.lock().unwrap().fail_next = Some(reason.to_string());
    }

    pub fn created_commands(&self) -> Vec<EventCreateCommand> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn applied_patches(&self) -> Vec<(String, EventPatch)> {
        self.state.lock().unwrap().patches.clone()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    fn check_failure(
        state: &mut GatewayState,
        operation: &'static str,
    ) -> Result<(), GatewayError> {
        if let Some(reason) = state.fail_next.take() {
            return Err(GatewayError::RequestFailed { operation, reason });
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarGateway for RecordingGateway {
    async fn list(
        &self,
        _creds: &CalendarCredentials,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<Event>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&mut state, "list")?;
        let mut events: Vec<Event> = state
            .events
            .iter()
            .filter(|e| e.start >= window.start && e.start < window.end)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start);
        events.truncate(limit);
        Ok(events)
    }

    async fn get(
        &self,
        _creds: &CalendarCredentials,
        event_id: &str,
    ) -> Result<Event, GatewayError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&mut state, "get")?;
        state
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| GatewayError::EventNotFound {
                event_id: event_id.to_string(),
            })
    }

    async fn create(
        &self,
        _creds: &CalendarCredentials,
        command: EventCreateCommand,
    ) -> Result<Event, GatewayError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&mut state, "create")?;
        let event = Event {
            id: format!("evt_new_{}", state.created.len() + 1),
            title: command.title.clone(),
            start: command.window.start,
            end: command.window.end,
            description: command.description.clone(),
            location: command.location.clone(),
            attendees: command.attendees.clone(),
        };
        state.created.push(command);
        state.events.push(event.clone());
        Ok(event)
    }

    async fn update(
        &self,
        _creds: &CalendarCredentials,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<Event, GatewayError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&mut state, "update")?;
        let Some(event) = state.events.iter_mut().find(|e| e.id == event_id) else {
            return Err(GatewayError::EventNotFound {
                event_id: event_id.to_string(),
            });
        };
        if let Some(title) = &patch.title {
            event.title = title.clone();
        }
        if let Some(window) = patch.window {
            event.start = window.start;
            event.end = window.end;
        }
        if let Some(description) = &patch.description {
            event.description = Some(description.clone());
        }
        if let Some(location) = &patch.location {
            event.location = Some(location.clone());
        }
        if let Some(attendees) = &patch.attendees {
            event.attendees = attendees.clone();
        }
        let updated = event.clone();
        state.patches.push((event_id.to_string(), patch));
        Ok(updated)
    }

    async fn delete(
        &self,
        _creds: &CalendarCredentials,
        event_id: &str,
    ) -> Result<bool, GatewayError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&mut state, "delete")?;
        let before = state.events.len();
        state.events.retain(|e| e.id != event_id);
        let existed = state.events.len() < before;
        if existed {
            state.deleted.push(event_id.to_string());
        }
        Ok(existed)
    }
}

/// A credential source returning the same token for every user.
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn credentials_for(&self, _user_id: UserId) -> Result<CalendarCredentials, GatewayError> {
        Ok(CalendarCredentials::new(self.token.clone()))
    }
}

/// An in-memory session store; the last inserted session per user is
/// the latest.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<Vec<ConversationSession>>,
    fail_read: Mutex<Option<String>>,
}

impl MemorySessionStore {
    /// Makes the next `find_latest` fail.
    pub fn fail_next_read(&self, reason: &str) {
        *self.fail_read.lock().unwrap() = Some(reason.to_string());
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find_latest(
        &self,
        user_id: UserId,
    ) -> Result<Option<ConversationSession>, SessionError> {
        if let Some(reason) = self.fail_read.lock().unwrap().take() {
            return Err(SessionError::StorageFailed { reason });
        }
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn insert(
        &self,
        session: ConversationSession,
    ) -> Result<ConversationSession, SessionError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }
}
