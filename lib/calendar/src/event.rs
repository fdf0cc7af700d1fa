//! Calendar event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event, normalized from the gateway's native shape.
///
/// The `id` is assigned by the calendar provider and treated as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Provider-assigned event identifier.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Start of the event, UTC.
    pub start: DateTime<Utc>,
    /// End of the event, UTC.
    pub end: DateTime<Utc>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
}

impl Event {
    /// Returns the event duration in whole minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn duration_in_minutes() {
        let start = Utc.with_ymd_and_hms(2026, 8, 26, 15, 0, 0).unwrap();
        let event = Event {
            id: "evt1".to_string(),
            title: "Standup".to_string(),
            start,
            end: start + chrono::Duration::minutes(45),
            description: None,
            location: None,
            attendees: vec![],
        };
        assert_eq!(event.duration_minutes(), 45);
    }

    #[test]
    fn event_serde_roundtrip() {
        let start = Utc.with_ymd_and_hms(2026, 8, 26, 15, 0, 0).unwrap();
        let event = Event {
            id: "evt2".to_string(),
            title: "Review".to_string(),
            start,
            end: start + chrono::Duration::hours(1),
            description: Some("quarterly".to_string()),
            location: Some("Room 4".to_string()),
            attendees: vec!["a@example.com".to_string()],
        };
        let json = serde_json::to_string(&event).expect("serialize");
        let parsed: Event = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(event, parsed);
    }
}
