//! Conversation orchestration core for the datebook assistant.
//!
//! This crate turns a single authenticated user message into zero or
//! more calendar tool executions and one final textual answer, while
//! keeping the provider-hosted conversation thread consistent across
//! round-trips. It provides:
//!
//! - **Session management**: durable user → thread mapping
//! - **Tool commands**: a closed union of calendar tools with typed
//!   argument decoding at the boundary
//! - **Dispatcher**: exhaustive tool execution against the calendar
//!   gateway
//! - **Orchestrator**: the bounded per-turn run/tool state machine
//! - **Runner**: the public entry point with the fallback boundary
//!
//! Transport, persistence schemas, and provider protocols are external;
//! they plug in through the capability traits re-exported here.

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod orchestrator;
pub mod runner;
pub mod session;
pub mod tool;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AssistantConfig;
pub use context::build_runtime_context;
pub use dispatcher::ToolDispatcher;
pub use error::{OrchestratorError, SessionError, ToolError};
pub use orchestrator::{ConversationOrchestrator, TurnOutput};
pub use runner::{AssistantReply, AssistantRunner};
pub use session::{ConversationSession, SessionManager, SessionStore};
pub use tool::ToolCommand;
