//! Process-local availability state for tracked servers.

use super::ParseAvailabilityStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability of one tracked server within a single process.
///
/// This state is never persisted: every record enters storage `Idle` and a
/// flush re-derives the table, carrying the state over only for identities
/// that survive the reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityState {
    /// The server is free to be handed out.
    #[default]
    Idle,
    /// The server is exclusively held by one sender.
    Busy,
}

impl AvailabilityState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
        }
    }

    /// Returns whether the server may be handed out.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for AvailabilityState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AvailabilityState {
    type Error = ParseAvailabilityStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "idle" => Ok(Self::Idle),
            "busy" => Ok(Self::Busy),
            _ => Err(ParseAvailabilityStateError(value.to_owned())),
        }
    }
}
