//! Run primitives for provider-hosted conversations.
//!
//! A *thread* is the durable conversation context held by the provider;
//! a *run* is one execution attempt over a thread. Runs end in a
//! terminal status or pause to request a tool result. All identifiers
//! here are assigned by the provider and treated as opaque strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;

/// Macro to generate an opaque string identifier assigned by the provider.
macro_rules! define_opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a provider-assigned identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_opaque_id!(
    /// Identifier of a durable conversation thread.
    ThreadId
);

define_opaque_id!(
    /// Identifier of a single run over a thread.
    RunId
);

define_opaque_id!(
    /// Identifier of a tool call issued within a run.
    ToolCallId
);

/// Status of a provider-side run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Run finished and produced assistant text.
    Completed,
    /// Run is paused waiting for a tool result.
    RequiresAction,
    /// Run failed on the provider side.
    Failed,
    /// Run was cancelled.
    Cancelled,
    /// Run expired before completing.
    Expired,
    /// Run is currently executing.
    InProgress,
    /// Run is active but not yet executing.
    Active,
}

impl RunStatus {
    /// Statuses a new turn cancels before submitting its own run.
    /// A prior run in one of these states is considered abandoned once
    /// a new user message arrives.
    pub const INTERRUPTIBLE: [RunStatus; 3] = [
        RunStatus::Active,
        RunStatus::InProgress,
        RunStatus::RequiresAction,
    ];

    /// Returns true if the run can make no further progress.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled | Self::Expired)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::RequiresAction => "requires_action",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::InProgress => "in_progress",
            Self::Active => "active",
        };
        f.write_str(s)
    }
}

/// A tool invocation requested by the model.
///
/// Immutable once constructed; consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the requested tool.
    pub name: String,
    /// Arguments as a JSON object mapping.
    pub arguments: JsonMap<String, JsonValue>,
}

impl ToolCall {
    /// Creates a tool call with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: JsonMap::new(),
        }
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }
}

/// A tool call the provider is waiting on, with its submission handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingToolCall {
    /// Identifier to pass back with the tool result.
    pub id: ToolCallId,
    /// The requested invocation.
    pub call: ToolCall,
}

/// Abstract state of an in-flight run, as seen by the orchestrator.
///
/// Produced by [`CompletionProvider`](crate::CompletionProvider)
/// methods; exists only for the duration of one turn and is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// The run finished with assistant-authored text.
    Completed {
        /// Concatenated assistant message segments from this run.
        text: String,
    },
    /// The run is paused, waiting for tool results.
    ///
    /// `pending` is reported in the provider's order; the orchestrator
    /// services only the first entry.
    RequiresAction {
        /// The run to resume with the tool result.
        run_id: RunId,
        /// Tool calls the provider is waiting on.
        pending: Vec<PendingToolCall>,
    },
    /// The run ended without text (failed, cancelled, or expired).
    Failed {
        /// The terminal status the provider reported.
        status: RunStatus,
    },
}

impl RunState {
    /// Returns true if this state ends the turn.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::RequiresAction { .. })
    }
}
