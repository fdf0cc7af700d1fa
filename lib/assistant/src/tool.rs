//! The closed union of calendar tools.
//!
//! Tool calls arrive from the provider as a name plus a JSON argument
//! mapping. Decoding that loose shape into a [`ToolCommand`] variant
//! happens here, at the registry boundary, exactly once; everything
//! past this point is compile-time checked. Adding a tool means adding
//! a variant and letting the exhaustive dispatch match force the rest.

use crate::error::ToolError;
use datebook_provider::ToolCall;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Tool name constants, as advertised to the model.
pub const CREATE_EVENT: &str = "create_event";
pub const LIST_EVENTS: &str = "list_events";
pub const UPDATE_EVENT: &str = "update_event";
pub const DELETE_EVENT: &str = "delete_event";

/// Arguments for `create_event`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventArgs {
    /// Event title.
    pub title: String,
    /// Natural-language start time.
    pub time_expression: String,
    /// Duration in minutes; defaults when absent.
    pub duration_minutes: Option<i64>,
    /// Optional location.
    pub location: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Attendee email addresses.
    #[serde(default)]
    pub attendees: Vec<String>,
}

/// Arguments for `list_events`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListEventsArgs {
    /// Natural-language start of the window to list.
    pub time_expression: String,
    /// Window length in minutes; defaults when absent.
    pub duration_minutes: Option<i64>,
    /// Maximum events to return; defaults when absent.
    pub limit: Option<usize>,
}

/// Arguments for `update_event`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEventArgs {
    /// The event to update.
    pub event_id: String,
    /// New title, if changing.
    pub title: Option<String>,
    /// New natural-language start time, if rescheduling.
    pub time_expression: Option<String>,
    /// New duration in minutes; when rescheduling without one, the
    /// event's existing duration is preserved.
    pub duration_minutes: Option<i64>,
    /// New location, if changing.
    pub location: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New attendee list, if replacing.
    pub attendees: Option<Vec<String>>,
}

/// Arguments for `delete_event`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteEventArgs {
    /// The event to delete.
    pub event_id: String,
}

/// A decoded, validated calendar tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCommand {
    /// Create a calendar event.
    CreateEvent(CreateEventArgs),
    /// List events in a window.
    ListEvents(ListEventsArgs),
    /// Update an existing event.
    UpdateEvent(UpdateEventArgs),
    /// Delete an event.
    DeleteEvent(DeleteEventArgs),
}

impl ToolCommand {
    /// Names of every tool in the registry.
    pub const NAMES: [&'static str; 4] = [CREATE_EVENT, LIST_EVENTS, UPDATE_EVENT, DELETE_EVENT];

    /// Decodes a raw tool call into a command.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTool` for names outside the registry and
    /// `InvalidArguments` when the argument mapping does not fit the
    /// tool's schema.
    pub fn decode(call: &ToolCall) -> Result<Self, ToolError> {
        let args = JsonValue::Object(call.arguments.clone());
        match call.name.as_str() {
            CREATE_EVENT => decode_args(CREATE_EVENT, args).map(Self::CreateEvent),
            LIST_EVENTS => decode_args(LIST_EVENTS, args).map(Self::ListEvents),
            UPDATE_EVENT => decode_args(UPDATE_EVENT, args).map(Self::UpdateEvent),
            DELETE_EVENT => decode_args(DELETE_EVENT, args).map(Self::DeleteEvent),
            _ => Err(ToolError::UnknownTool {
                name: call.name.clone(),
            }),
        }
    }

    /// Returns the command's registry name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateEvent(_) => CREATE_EVENT,
            Self::ListEvents(_) => LIST_EVENTS,
            Self::UpdateEvent(_) => UPDATE_EVENT,
            Self::DeleteEvent(_) => DELETE_EVENT,
        }
    }
}

fn decode_args<T: for<'de> Deserialize<'de>>(
    tool: &'static str,
    args: JsonValue,
) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool,
        reason: e.to_string(),
    })
}
