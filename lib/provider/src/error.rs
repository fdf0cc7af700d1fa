//! Error types for completion provider operations.

use crate::run::{RunId, ThreadId};
use std::fmt;

/// Errors from completion provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Thread creation was rejected.
    ThreadCreateFailed {
        /// Error details.
        reason: String,
    },
    /// Starting a run on a thread failed.
    RunStartFailed {
        /// The thread the run was submitted to.
        thread_id: ThreadId,
        /// Error details.
        reason: String,
    },
    /// Submitting a tool result to a run failed.
    ToolSubmitFailed {
        /// The run the result was submitted to.
        run_id: RunId,
        /// Error details.
        reason: String,
    },
    /// Cancelling runs on a thread failed.
    CancelFailed {
        /// The thread whose runs were being cancelled.
        thread_id: ThreadId,
        /// Error details.
        reason: String,
    },
    /// The provider's response could not be interpreted.
    ResponseParseFailed {
        /// Error details.
        reason: String,
    },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreadCreateFailed { reason } => {
                write!(f, "failed to create thread: {reason}")
            }
            Self::RunStartFailed { thread_id, reason } => {
                write!(f, "failed to start run on thread {thread_id}: {reason}")
            }
            Self::ToolSubmitFailed { run_id, reason } => {
                write!(f, "failed to submit tool result to run {run_id}: {reason}")
            }
            Self::CancelFailed { thread_id, reason } => {
                write!(f, "failed to cancel runs on thread {thread_id}: {reason}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse provider response: {reason}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}
