//! Ephemeral run-scoped context.
//!
//! A small grounding preamble attached to a single run so the model
//! can resolve relative dates. It is built fresh per turn and never
//! persisted into the thread.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Builds the runtime instructions for one assistant run.
#[must_use]
pub fn build_runtime_context(now: DateTime<Utc>, zone: Tz) -> String {
    let local = now.with_timezone(&zone);
    format!(
        "Runtime context:\n\
         - Today is {date}\n\
         - Current time is {time} {zone}\n\
         - Timezone: {zone}\n\
         \n\
         Rules:\n\
         - Resolve relative dates (today, tomorrow, next week) based on the date above.\n\
         - Always convert dates to absolute ISO 8601 datetimes.\n\
         - Use the timezone above unless the user explicitly specifies another.",
        date = local.format("%Y-%m-%d"),
        time = local.format("%H:%M"),
        zone = zone,
    )
}
