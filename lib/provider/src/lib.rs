//! Completion provider capability for the datebook assistant.
//!
//! This crate defines the contract the assistant core uses to talk to
//! an LLM chat-completion service that hosts durable conversation
//! threads and runs:
//!
//! - **Run primitives**: thread/run/tool-call identifiers, run status,
//!   tool calls, and the per-turn `RunState`
//! - **CompletionProvider**: the async trait implementations provide
//!
//! Protocol details, polling, and token refresh belong entirely to
//! implementations of [`CompletionProvider`].

pub mod error;
pub mod provider;
pub mod run;

pub use error::ProviderError;
pub use provider::CompletionProvider;
pub use run::{PendingToolCall, RunId, RunState, RunStatus, ThreadId, ToolCall, ToolCallId};
