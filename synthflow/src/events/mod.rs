//! Run events.
//!
//! The runner reports its progress through an [`EventSink`]. Events carry a
//! dotted type name (see [`RunEvent`]) and an optional JSON payload.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The events a run emits, in the order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunEvent {
    /// The range was validated and the run began.
    #[serde(rename = "run.started")]
    RunStarted,
    /// A stage within the range was entered.
    #[serde(rename = "stage.started")]
    StageStarted,
    /// An included invocation was handed to the executor and returned.
    #[serde(rename = "invocation.dispatched")]
    InvocationDispatched,
    /// An invocation was planned but excluded.
    #[serde(rename = "invocation.skipped")]
    InvocationSkipped,
    /// The executor reported a failure.
    #[serde(rename = "invocation.failed")]
    InvocationFailed,
    /// Every invocation of a stage finished.
    #[serde(rename = "stage.completed")]
    StageCompleted,
    /// The run finished.
    #[serde(rename = "run.completed")]
    RunCompleted,
    /// The run aborted.
    #[serde(rename = "run.failed")]
    RunFailed,
}

impl RunEvent {
    /// Returns the dotted event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunStarted => "run.started",
            Self::StageStarted => "stage.started",
            Self::InvocationDispatched => "invocation.dispatched",
            Self::InvocationSkipped => "invocation.skipped",
            Self::InvocationFailed => "invocation.failed",
            Self::StageCompleted => "stage.completed",
            Self::RunCompleted => "run.completed",
            Self::RunFailed => "run.failed",
        }
    }
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for event in [RunEvent::RunStarted, RunEvent::InvocationSkipped, RunEvent::RunFailed] {
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{}\"", event.as_str()));
        }
    }
}
