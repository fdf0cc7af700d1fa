//! Core domain types for the datebook assistant.
//!
//! This crate provides the strongly-typed identifiers shared by the
//! other datebook crates.

pub mod id;

pub use id::{ConversationSessionId, ParseIdError, UserId};
