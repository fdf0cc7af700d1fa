//! Error types for the assistant crate.
//!
//! - `SessionError`: session lookup/creation failures
//! - `ToolError`: tool decoding and execution failures
//! - `OrchestratorError`: turn-level failures, the only kind the
//!   runner's fallback boundary sees

use datebook_core::UserId;
use datebook_provider::{ProviderError, RunId, RunStatus};
use std::fmt;

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session storage read or write failed.
    StorageFailed {
        /// Error details.
        reason: String,
    },
    /// The provider refused to create a thread for a new session.
    ThreadCreateFailed {
        /// Error details.
        reason: String,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageFailed { reason } => {
                write!(f, "session storage failed: {reason}")
            }
            Self::ThreadCreateFailed { reason } => {
                write!(f, "failed to create thread for new session: {reason}")
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Errors from tool decoding and execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The requested tool name is not in the registry.
    UnknownTool {
        /// The unrecognized name.
        name: String,
    },
    /// The arguments did not match the tool's schema, or a value in
    /// them (such as a time expression) could not be resolved.
    InvalidArguments {
        /// The tool whose arguments were rejected.
        tool: &'static str,
        /// Error details.
        reason: String,
    },
    /// The tool executed and failed. Internal error types never leak
    /// past this variant.
    ExecutionFailed {
        /// The tool that failed.
        tool: &'static str,
        /// The user the tool ran for.
        user_id: UserId,
    },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTool { name } => write!(f, "unknown tool: {name}"),
            Self::InvalidArguments { tool, reason } => {
                write!(f, "invalid arguments for tool '{tool}': {reason}")
            }
            Self::ExecutionFailed { tool, user_id } => {
                write!(f, "failed to execute tool '{tool}' for user {user_id}")
            }
        }
    }
}

impl std::error::Error for ToolError {}

/// Errors that end a conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// A completion provider call failed.
    Provider(ProviderError),
    /// Tool decoding or execution failed.
    Tool(ToolError),
    /// The provider reported a terminal non-completed run status.
    RunFailed {
        /// The status reported (failed, cancelled, or expired).
        status: RunStatus,
    },
    /// The tool-resolution cycle exceeded its cap.
    ToolRoundsExceeded {
        /// The configured maximum.
        max: u32,
    },
    /// The provider reported requires_action with nothing pending.
    NoPendingToolCall {
        /// The offending run.
        run_id: RunId,
    },
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(e) => write!(f, "provider error: {e}"),
            Self::Tool(e) => write!(f, "tool error: {e}"),
            Self::RunFailed { status } => write!(f, "run ended with status: {status}"),
            Self::ToolRoundsExceeded { max } => {
                write!(f, "exceeded {max} tool rounds in one turn")
            }
            Self::NoPendingToolCall { run_id } => {
                write!(f, "run {run_id} requires action but has no pending tool call")
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl From<ProviderError> for OrchestratorError {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}

impl From<ToolError> for OrchestratorError {
    fn from(e: ToolError) -> Self {
        Self::Tool(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_display() {
        let err = SessionError::StorageFailed {
            reason: "connection reset".to_string(),
        };
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn tool_error_display() {
        let err = ToolError::UnknownTool {
            name: "send_email".to_string(),
        };
        assert!(err.to_string().contains("send_email"));

        let err = ToolError::ExecutionFailed {
            tool: "create_event",
            user_id: UserId::new(),
        };
        assert!(err.to_string().contains("create_event"));
    }

    #[test]
    fn orchestrator_error_display() {
        let err = OrchestratorError::RunFailed {
            status: RunStatus::Expired,
        };
        assert!(err.to_string().contains("expired"));

        let err = OrchestratorError::ToolRoundsExceeded { max: 5 };
        assert!(err.to_string().contains('5'));
    }
}
