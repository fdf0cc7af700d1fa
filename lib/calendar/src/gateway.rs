//! Calendar gateway trait and credentials.

use crate::command::{EventCreateCommand, EventPatch, TimeWindow};
use crate::error::GatewayError;
use crate::event::Event;
use async_trait::async_trait;
use datebook_core::UserId;
use std::fmt;

/// Opaque, always-valid credentials for one gateway call.
///
/// Refresh and storage happen entirely outside this core; a credential
/// object is resolved per call and assumed valid for its duration.
/// The token is redacted from `Debug` output.
#[derive(Clone)]
pub struct CalendarCredentials {
    token: String,
}

impl CalendarCredentials {
    /// Wraps an access token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns the bearer token for the underlying transport.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for CalendarCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarCredentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Resolves a user to fresh calendar credentials.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Returns valid credentials for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user has no usable credentials.
    async fn credentials_for(&self, user_id: UserId) -> Result<CalendarCredentials, GatewayError>;
}

/// Trait for calendar providers.
///
/// All calendar reads and writes performed by the tool layer go through
/// this interface. Implementations own the provider's wire protocol.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Lists events within the window, up to `limit`, ordered by start.
    async fn list(
        &self,
        creds: &CalendarCredentials,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<Event>, GatewayError>;

    /// Fetches an event by id.
    async fn get(
        &self,
        creds: &CalendarCredentials,
        event_id: &str,
    ) -> Result<Event, GatewayError>;

    /// Creates an event and returns the stored representation.
    async fn create(
        &self,
        creds: &CalendarCredentials,
        command: EventCreateCommand,
    ) -> Result<Event, GatewayError>;

    /// Applies a partial update and returns the updated event.
    async fn update(
        &self,
        creds: &CalendarCredentials,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<Event, GatewayError>;

    /// Deletes an event. Returns true if the event existed.
    async fn delete(
        &self,
        creds: &CalendarCredentials,
        event_id: &str,
    ) -> Result<bool, GatewayError>;
}
