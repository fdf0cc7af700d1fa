//! Tool dispatch against the calendar gateway.
//!
//! The dispatcher owns the tool registry: it decodes raw tool calls
//! into [`ToolCommand`]s, resolves time expressions in the reference
//! timezone, and executes them against the gateway. Every result is a
//! JSON object suitable for submitting back to the provider. Gateway
//! failures are logged here and collapsed into a uniform
//! [`ToolError::ExecutionFailed`] carrying only the tool name and the
//! user id.

use crate::error::ToolError;
use crate::tool::{
    CreateEventArgs, DeleteEventArgs, ListEventsArgs, ToolCommand, UpdateEventArgs,
};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use datebook_calendar::{
    CalendarCredentials, CalendarGateway, CredentialSource, Event, EventCreateCommand, EventPatch,
    GatewayError, TimeParseError, TimeWindow, resolve_instant, resolve_window,
};
use datebook_core::UserId;
use datebook_provider::ToolCall;
use serde_json::{Value as JsonValue, json};
use tracing::{debug, instrument, warn};

/// Default number of events returned by `list_events`.
const DEFAULT_LIST_LIMIT: usize = 10;

/// Executes decoded tool calls against a calendar gateway.
pub struct ToolDispatcher<G, C> {
    gateway: G,
    credentials: C,
    zone: Tz,
    default_duration_minutes: i64,
}

impl<G, C> ToolDispatcher<G, C>
where
    G: CalendarGateway,
    C: CredentialSource,
{
    /// Creates a dispatcher over a gateway and credential source.
    #[must_use]
    pub fn new(gateway: G, credentials: C, zone: Tz, default_duration_minutes: i64) -> Self {
        Self {
            gateway,
            credentials,
            zone,
            default_duration_minutes,
        }
    }

    /// Decodes and executes a tool call for the user.
    ///
    /// `now` is the reference instant for time-expression resolution.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTool` or `InvalidArguments` for calls that fail
    /// decoding or time resolution, and `ExecutionFailed` for any
    /// credential or gateway failure.
    #[instrument(skip(self, call), fields(user_id = %user_id, tool = %call.name))]
    pub async fn dispatch(
        &self,
        user_id: UserId,
        call: &ToolCall,
        now: DateTime<Utc>,
    ) -> Result<JsonValue, ToolError> {
        let command = ToolCommand::decode(call)?;
        let tool = command.name();
        let creds = self
            .credentials
            .credentials_for(user_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "credential resolution failed");
                ToolError::ExecutionFailed { tool, user_id }
            })?;

        let result = match command {
            ToolCommand::CreateEvent(args) => self.create_event(&creds, args, now).await,
            ToolCommand::ListEvents(args) => self.list_events(&creds, args, now).await,
            ToolCommand::UpdateEvent(args) => self.update_event(&creds, args, now).await,
            ToolCommand::DeleteEvent(args) => self.delete_event(&creds, args).await,
        };
        match result {
            Ok(value) => {
                debug!("tool call succeeded");
                Ok(value)
            }
            Err(DispatchFailure::BadArguments(reason)) => {
                Err(ToolError::InvalidArguments { tool, reason })
            }
            Err(DispatchFailure::Gateway(e)) => {
                warn!(error = %e, "tool execution failed");
                Err(ToolError::ExecutionFailed { tool, user_id })
            }
        }
    }

    async fn create_event(
        &self,
        creds: &CalendarCredentials,
        args: CreateEventArgs,
        now: DateTime<Utc>,
    ) -> Result<JsonValue, DispatchFailure> {
        let duration = args
            .duration_minutes
            .unwrap_or(self.default_duration_minutes);
        let window = resolve_window(&args.time_expression, duration, now, self.zone)?;
        let mut command = EventCreateCommand::new(args.title, window);
        if let Some(description) = args.description {
            command = command.with_description(description);
        }
        if let Some(location) = args.location {
            command = command.with_location(location);
        }
        if !args.attendees.is_empty() {
            command = command.with_attendees(args.attendees);
        }
        let event = self.gateway.create(creds, command).await?;
        Ok(json!({
            "status": "created",
            "event_id": event.id,
            "title": event.title,
            "start": event.start,
            "end": event.end,
        }))
    }

    async fn list_events(
        &self,
        creds: &CalendarCredentials,
        args: ListEventsArgs,
        now: DateTime<Utc>,
    ) -> Result<JsonValue, DispatchFailure> {
        let duration = args
            .duration_minutes
            .unwrap_or(self.default_duration_minutes);
        let limit = args.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let window = resolve_window(&args.time_expression, duration, now, self.zone)?;
        let events = self.gateway.list(creds, window, limit).await?;
        let entries: Vec<JsonValue> = events.iter().map(event_summary).collect();
        Ok(json!({
            "count": entries.len(),
            "events": entries,
        }))
    }

    async fn update_event(
        &self,
        creds: &CalendarCredentials,
        args: UpdateEventArgs,
        now: DateTime<Utc>,
    ) -> Result<JsonValue, DispatchFailure> {
        let window = self
            .resolve_update_window(creds, &args, now)
            .await?;
        let patch = EventPatch {
            title: args.title,
            window,
            description: args.description,
            location: args.location,
            attendees: args.attendees,
        };
        if patch.is_empty() {
            return Err(DispatchFailure::BadArguments(
                "update requests no changes".to_string(),
            ));
        }
        let event = self.gateway.update(creds, &args.event_id, patch).await?;
        Ok(json!({
            "status": "updated",
            "event_id": event.id,
            "title": event.title,
            "start": event.start,
            "end": event.end,
        }))
    }

    /// Builds the new window for an update, if any time change was
    /// requested. A new start without a duration keeps the event's
    /// current duration, so rescheduling never silently resizes it.
    async fn resolve_update_window(
        &self,
        creds: &CalendarCredentials,
        args: &UpdateEventArgs,
        now: DateTime<Utc>,
    ) -> Result<Option<TimeWindow>, DispatchFailure> {
        match (&args.time_expression, args.duration_minutes) {
            (None, None) => Ok(None),
            (Some(expression), Some(minutes)) => {
                Ok(Some(resolve_window(expression, minutes, now, self.zone)?))
            }
            (Some(expression), None) => {
                let existing = self.gateway.get(creds, &args.event_id).await?;
                let start = resolve_instant(expression, now, self.zone)?;
                Ok(Some(TimeWindow::new(
                    start,
                    start + Duration::minutes(existing.duration_minutes()),
                )))
            }
            (None, Some(minutes)) => {
                if minutes <= 0 {
                    return Err(TimeParseError::InvalidDuration { minutes }.into());
                }
                let existing = self.gateway.get(creds, &args.event_id).await?;
                Ok(Some(TimeWindow::new(
                    existing.start,
                    existing.start + Duration::minutes(minutes),
                )))
            }
        }
    }

    async fn delete_event(
        &self,
        creds: &CalendarCredentials,
        args: DeleteEventArgs,
    ) -> Result<JsonValue, DispatchFailure> {
        let existed = self.gateway.delete(creds, &args.event_id).await?;
        if !existed {
            return Err(DispatchFailure::Gateway(
                GatewayError::EventNotFound {
                    event_id: args.event_id,
                },
            ));
        }
        Ok(json!({
            "status": "deleted",
            "event_id": args.event_id,
        }))
    }
}

fn event_summary(event: &Event) -> JsonValue {
    let mut entry = json!({
        "id": event.id,
        "title": event.title,
        "start": event.start,
        "end": event.end,
    });
    if let (Some(location), Some(map)) = (&event.location, entry.as_object_mut()) {
        map.insert("location".to_string(), json!(location));
    }
    entry
}

/// Internal split between argument failures and gateway failures, so
/// `dispatch` can map each to the right `ToolError` class.
enum DispatchFailure {
    BadArguments(String),
    Gateway(GatewayError),
}

impl From<TimeParseError> for DispatchFailure {
    fn from(e: TimeParseError) -> Self {
        Self::BadArguments(e.to_string())
    }
}

impl From<GatewayError> for DispatchFailure {
    fn from(e: GatewayError) -> Self {
        Self::Gateway(e)
    }
}
