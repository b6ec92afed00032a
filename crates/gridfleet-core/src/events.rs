//! Structured notifications published by the coordinator.
//!
//! The engine never talks to a UI directly; observers registered with the
//! coordinator receive event records and decide how to surface them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    FlightStarted,
    FlightQueued,
    FlightCompleted,
    FlightRecalled,
    CommandRejected,
    ConflictDetected,
    ConflictResolved,
    SystemReset,
}

/// One notification record: what happened, to whom, in words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinationEvent {
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drone_id: Option<u32>,
    pub message: String,
}

impl CoordinationEvent {
    pub fn new(kind: EventKind, drone_id: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            kind,
            drone_id,
            message: message.into(),
        }
    }
}

/// Receives coordinator notifications. Implementations must not mutate
/// engine state; they see events after the fact.
pub trait CoordinationObserver {
    fn on_event(&self, event: &CoordinationEvent);
}

/// Result of an engine command. Invalid commands reject with a
/// human-readable reason instead of raising an error; the drone set is
/// left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "outcome")]
pub enum CommandOutcome {
    Accepted,
    Rejected { reason: String },
}

impl CommandOutcome {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, CommandOutcome::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_predicates() {
        assert!(CommandOutcome::Accepted.is_accepted());
        assert!(!CommandOutcome::rejected("drone 9 is currently flying").is_accepted());
    }

    #[test]
    fn test_event_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&EventKind::CommandRejected).unwrap();
        assert_eq!(json, "\"command-rejected\"");
    }
}
