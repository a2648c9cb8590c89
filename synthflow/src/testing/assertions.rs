//! Test assertions for run summaries and plan reports.

use crate::core::InvocationStatus;
use crate::pipeline::PlanReport;
use crate::runner::RunSummary;

/// Asserts that exactly `expected` command lines were dispatched, in order.
pub fn assert_dispatched(summary: &RunSummary, expected: &[&str]) {
    let actual = summary.dispatched_commands();
    assert_eq!(
        actual, expected,
        "Expected dispatched commands {expected:?}, got {actual:?}"
    );
}

/// Asserts that the run handed nothing to the executor.
pub fn assert_nothing_dispatched(summary: &RunSummary) {
    assert_eq!(
        summary.dispatched_count(),
        0,
        "Expected no dispatches, got {:?}",
        summary.dispatched_commands()
    );
}

/// Asserts that `operation` was skipped at least once in the run.
pub fn assert_skipped_with(summary: &RunSummary, operation: &str) {
    assert!(
        summary
            .with_status(InvocationStatus::Skipped)
            .any(|r| r.operation == operation),
        "Expected '{operation}' to be skipped"
    );
}

/// Asserts the planned lines of one stage in a report.
pub fn assert_stage_lines(report: &PlanReport, label: &str, expected: &[&str]) {
    let actual = report.stage_lines(label);
    assert_eq!(
        actual, expected,
        "Unexpected plan for stage '{label}':\n{report}"
    );
}
