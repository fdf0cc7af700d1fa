//! Commands accepted by the calendar gateway.
//!
//! Commands carry absolute UTC instants only; natural-language time
//! resolution happens in [`timex`](crate::timex) before a command is
//! built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An absolute time range, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window from start and end instants.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns the window length in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Command to create a calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCreateCommand {
    /// Event title.
    pub title: String,
    /// Absolute event window.
    pub window: TimeWindow,
    /// Optional description.
    pub description: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
}

impl EventCreateCommand {
    /// Creates a command with only the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            title: title.into(),
            window,
            description: None,
            location: None,
            attendees: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the attendees.
    #[must_use]
    pub fn with_attendees(mut self, attendees: Vec<String>) -> Self {
        self.attendees = attendees;
        self
    }
}

/// Partial update for an existing event. `None` fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New window, if rescheduling.
    pub window: Option<TimeWindow>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New location, if changing.
    pub location: Option<String>,
    /// New attendee list, if replacing.
    pub attendees: Option<Vec<String>>,
}

impl EventPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.window.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.attendees.is_none()
    }
}
