//! Run mode, runner state and invocation status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a plan is executed against a design or only rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Dispatch every included invocation to the executor.
    Execute,
    /// Render the planned invocations without dispatching anything.
    Describe,
}

impl Default for RunMode {
    fn default() -> Self {
        Self::Execute
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execute => write!(f, "execute"),
            Self::Describe => write!(f, "describe"),
        }
    }
}

/// The lifecycle state of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No run in progress.
    Idle,
    /// A run is in progress.
    Running,
}

impl Default for RunState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
        }
    }
}

/// What happened to one planned invocation during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    /// Handed to the executor and completed.
    Dispatched,
    /// Excluded by one of its gates.
    Skipped,
    /// Rendered into a describe-mode report.
    Described,
    /// Handed to the executor, which reported an error.
    Failed,
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatched => write!(f, "dispatched"),
            Self::Skipped => write!(f, "skipped"),
            Self::Described => write!(f, "described"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_display() {
        assert_eq!(RunMode::Execute.to_string(), "execute");
        assert_eq!(RunMode::Describe.to_string(), "describe");
    }

    #[test]
    fn test_run_state_default() {
        assert_eq!(RunState::default(), RunState::Idle);
        assert_eq!(RunState::Running.to_string(), "running");
    }

    #[test]
    fn test_invocation_status_serialize() {
        let json = serde_json::to_string(&InvocationStatus::Skipped).unwrap();
        assert_eq!(json, r#""skipped""#);

        let status: InvocationStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, InvocationStatus::Skipped);
    }
}
