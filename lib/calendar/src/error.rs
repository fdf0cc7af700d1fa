//! Error types for the calendar crate.
//!
//! - `GatewayError`: failures from calendar gateway operations
//! - `TimeParseError`: unresolvable natural-language time expressions

use std::fmt;

/// Errors from calendar gateway operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No usable credentials for the user.
    CredentialsUnavailable {
        /// Error details.
        reason: String,
    },
    /// The calendar provider rejected or failed the request.
    RequestFailed {
        /// The operation that failed (list, create, ...).
        operation: &'static str,
        /// Error details.
        reason: String,
    },
    /// The referenced event does not exist.
    EventNotFound {
        /// The provider-assigned event id.
        event_id: String,
    },
    /// The provider's response could not be interpreted.
    ResponseParseFailed {
        /// Error details.
        reason: String,
    },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CredentialsUnavailable { reason } => {
                write!(f, "calendar credentials unavailable: {reason}")
            }
            Self::RequestFailed { operation, reason } => {
                write!(f, "calendar {operation} failed: {reason}")
            }
            Self::EventNotFound { event_id } => {
                write!(f, "event not found: {event_id}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse calendar response: {reason}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

/// Errors from time-expression resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    /// The expression did not match any supported form.
    Unrecognized {
        /// The offending expression.
        expression: String,
    },
    /// A clock time in the expression was out of range.
    InvalidClockTime {
        /// The offending time fragment.
        fragment: String,
    },
    /// The resolved local time does not exist in the reference zone
    /// (daylight-saving gap).
    NonexistentLocalTime {
        /// The offending expression.
        expression: String,
        /// The zone in which resolution was attempted.
        zone: String,
    },
    /// The duration was not a positive number of minutes.
    InvalidDuration {
        /// The offending value.
        minutes: i64,
    },
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized { expression } => {
                write!(f, "could not resolve time expression: '{expression}'")
            }
            Self::InvalidClockTime { fragment } => {
                write!(f, "invalid clock time: '{fragment}'")
            }
            Self::NonexistentLocalTime { expression, zone } => {
                write!(
                    f,
                    "'{expression}' resolves to a nonexistent local time in {zone}"
                )
            }
            Self::InvalidDuration { minutes } => {
                write!(f, "duration must be positive, got {minutes} minutes")
            }
        }
    }
}

impl std::error::Error for TimeParseError {}
