//! Calendar gateway capability for the datebook assistant.
//!
//! This crate provides:
//!
//! - **Event model**: provider-neutral calendar events and commands
//! - **Gateway**: the trait the tool layer calls for calendar reads
//!   and writes, with opaque per-call credentials
//! - **Timex**: natural-language time-expression resolution against a
//!   reference timezone
//!
//! OAuth flows and calendar-provider wire details live entirely inside
//! implementations of [`CalendarGateway`].

pub mod command;
pub mod error;
pub mod event;
pub mod gateway;
pub mod timex;

pub use command::{EventCreateCommand, EventPatch, TimeWindow};
pub use error::{GatewayError, TimeParseError};
pub use event::Event;
pub use gateway::{CalendarCredentials, CalendarGateway, CredentialSource};
pub use timex::{resolve_instant, resolve_window};
