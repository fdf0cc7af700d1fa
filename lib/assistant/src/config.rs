//! Assistant configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables. Every field has a safe default so the
//! assistant runs unconfigured.

use chrono_tz::Tz;
use serde::Deserialize;

/// Configuration for the assistant core.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// IANA timezone in which natural-language time expressions are
    /// resolved before conversion to UTC.
    #[serde(default = "default_reference_timezone")]
    pub reference_timezone: String,

    /// Maximum tool-execution rounds per turn. Exceeding it fails the
    /// turn; this is loop protection against a model issuing unbounded
    /// tool calls.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    /// Event duration in minutes when the model does not supply one.
    #[serde(default = "default_event_duration_minutes")]
    pub default_event_duration_minutes: i64,

    /// Text returned to the user when a turn fails for any reason.
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,
}

fn default_reference_timezone() -> String {
    "UTC".to_string()
}

fn default_max_tool_rounds() -> u32 {
    5
}

fn default_event_duration_minutes() -> i64 {
    60
}

fn default_fallback_text() -> String {
    "Sorry, something went wrong while processing your request.".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            reference_timezone: default_reference_timezone(),
            max_tool_rounds: default_max_tool_rounds(),
            default_event_duration_minutes: default_event_duration_minutes(),
            fallback_text: default_fallback_text(),
        }
    }
}

impl AssistantConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable fails to parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parses the configured reference timezone.
    ///
    /// # Errors
    ///
    /// Returns an error naming the invalid zone.
    pub fn reference_tz(&self) -> Result<Tz, config::ConfigError> {
        self.reference_timezone.parse().map_err(|_| {
            config::ConfigError::Message(format!(
                "unknown reference timezone: {}",
                self.reference_timezone
            ))
        })
    }
}
