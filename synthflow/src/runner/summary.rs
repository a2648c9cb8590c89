//! Run summaries.

use crate::core::{InvocationStatus, Label, LabelRange, RunMode, TargetFamily};
use crate::pipeline::PlanReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// What happened to one planned invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationRecord {
    /// The stage label.
    pub label: Label,
    /// The operation name.
    pub operation: String,
    /// The argument string.
    pub arguments: String,
    /// The outcome.
    pub status: InvocationStatus,
    /// Time spent in the executor.
    pub duration_ms: u64,
}

impl InvocationRecord {
    /// Returns the operation and its arguments as one command line.
    #[must_use]
    pub fn command_line(&self) -> String {
        if self.arguments.is_empty() {
            self.operation.clone()
        } else {
            format!("{} {}", self.operation, self.arguments)
        }
    }
}

/// The result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// The family the plan was built for.
    pub family: TargetFamily,
    /// Execute or describe.
    pub mode: RunMode,
    /// The label range that was visited.
    pub range: LabelRange,
    /// Digest of the full plan.
    pub fingerprint: String,
    /// Labels visited, in order.
    pub stages: Vec<Label>,
    /// One record per planned invocation in the range.
    pub records: Vec<InvocationRecord>,
    /// The rendered plan, in describe mode.
    pub report: Option<PlanReport>,
    /// When the run began.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Returns the records with `status`.
    pub fn with_status(&self, status: InvocationStatus) -> impl Iterator<Item = &InvocationRecord> {
        self.records.iter().filter(move |r| r.status == status)
    }

    /// Returns the command lines handed to the executor, in order.
    #[must_use]
    pub fn dispatched_commands(&self) -> Vec<String> {
        self.with_status(InvocationStatus::Dispatched)
            .map(InvocationRecord::command_line)
            .collect()
    }

    /// Returns the number of invocations handed to the executor.
    #[must_use]
    pub fn dispatched_count(&self) -> usize {
        self.with_status(InvocationStatus::Dispatched).count()
    }

    /// Returns the wall-clock duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Returns the report text, if this was a describe run.
    #[must_use]
    pub fn report_text(&self) -> Option<&str> {
        self.report.as_ref().map(PlanReport::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(operation: &str, arguments: &str, status: InvocationStatus) -> InvocationRecord {
        InvocationRecord {
            label: Label::Prepare,
            operation: operation.to_string(),
            arguments: arguments.to_string(),
            status,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_dispatched_commands() {
        let now = Utc::now();
        let summary = RunSummary {
            run_id: Uuid::new_v4(),
            family: TargetFamily::Pp3,
            mode: RunMode::Execute,
            range: LabelRange::single(Label::Prepare),
            fingerprint: String::new(),
            stages: vec![Label::Prepare],
            records: vec![
                record("proc", "", InvocationStatus::Dispatched),
                record("tribuf", "-logic", InvocationStatus::Skipped),
                record("opt_expr", "-fine", InvocationStatus::Dispatched),
            ],
            report: None,
            started_at: now,
            finished_at: now,
        };

        assert_eq!(summary.dispatched_commands(), vec!["proc", "opt_expr -fine"]);
        assert_eq!(summary.dispatched_count(), 2);
        assert_eq!(summary.duration_ms(), 0);
        assert!(summary.report_text().is_none());
    }
}
