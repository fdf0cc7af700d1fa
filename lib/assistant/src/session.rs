//! Conversation session management.
//!
//! A session binds a user to a durable provider thread. Sessions are
//! created lazily on first contact and never deleted here; the latest
//! session for a user is the active one, and its `thread_id` is stable
//! for the session's lifetime.

use crate::error::SessionError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use datebook_core::{ConversationSessionId, UserId};
use datebook_provider::{CompletionProvider, ThreadId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A conversation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    /// Unique session identifier.
    pub id: ConversationSessionId,
    /// The user who owns this session.
    pub user_id: UserId,
    /// The provider thread backing this session.
    pub thread_id: ThreadId,
    /// Optional topic (generated elsewhere from early messages).
    pub topic: Option<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Creates a new session binding a user to a thread.
    #[must_use]
    pub fn new(user_id: UserId, thread_id: ThreadId) -> Self {
        Self {
            id: ConversationSessionId::new(),
            user_id,
            thread_id,
            topic: None,
            created_at: Utc::now(),
        }
    }
}

/// Trait for session persistence.
///
/// The "latest" read is not required to be transactional with respect
/// to concurrent inserts; see [`SessionManager::get_or_create`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the most recently created session for the user, if any.
    async fn find_latest(&self, user_id: UserId) -> Result<Option<ConversationSession>, SessionError>;

    /// Persists a new session and returns the stored value.
    async fn insert(&self, session: ConversationSession) -> Result<ConversationSession, SessionError>;
}

/// Maps user identities to durable conversation threads.
pub struct SessionManager<S, P> {
    store: S,
    provider: Arc<P>,
}

impl<S, P> SessionManager<S, P>
where
    S: SessionStore,
    P: CompletionProvider,
{
    /// Creates a session manager over a store and a provider.
    pub fn new(store: S, provider: Arc<P>) -> Self {
        Self { store, provider }
    }

    /// Returns the user's active session, creating one on first contact.
    ///
    /// Idempotent when there is no concurrent writer: two sequential
    /// calls return the same `thread_id`. Two *concurrent* calls may
    /// both observe no session and each insert one; that race is
    /// deliberately not closed here.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or thread creation fails; the
    /// failure is not retried.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_or_create(&self, user_id: UserId) -> Result<ConversationSession, SessionError> {
        if let Some(session) = self.store.find_latest(user_id).await? {
            debug!(session_id = %session.id, thread_id = %session.thread_id, "reusing session");
            return Ok(session);
        }

        let thread_id = self
            .provider
            .create_thread()
            .await
            .map_err(|e| SessionError::ThreadCreateFailed {
                reason: e.to_string(),
            })?;
        let session = self
            .store
            .insert(ConversationSession::new(user_id, thread_id))
            .await?;
        debug!(session_id = %session.id, thread_id = %session.thread_id, "created session");
        Ok(session)
    }
}
