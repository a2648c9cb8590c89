//! Pipeline execution.
//!
//! A [`Runner`] visits the stages of a [`PipelineDefinition`] within a label
//! range. In execute mode it dispatches every included invocation, one at a
//! time, and stops at the first failure. In describe mode it renders the
//! plan and dispatches nothing.

mod summary;


pub use summary::{InvocationRecord, RunSummary};

use crate::core::{InvocationStatus, Label, LabelRange, RunMode, RunState};
use crate::dispatch::{DesignGraph, Dispatcher, OperationExecutor};
use crate::errors::{ConfigurationError, SynthflowError};
use crate::events::{EventSink, NoOpEventSink, RunEvent};
use crate::pipeline::{Invocation, PipelineDefinition};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Drives pipeline definitions through an executor.
pub struct Runner {
    dispatcher: Dispatcher,
    sink: Arc<dyn EventSink>,
    state: RunState,
}

impl Runner {
    /// Creates a runner over `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn OperationExecutor>) -> Self {
        Self {
            dispatcher: Dispatcher::new(executor),
            sink: Arc::new(NoOpEventSink),
            state: RunState::Idle,
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Runs `definition` over `range`.
    ///
    /// A definition built in describe mode is rendered instead; the design
    /// is then left untouched.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a bound of `range` has no stage or
    /// the design is only partially selected. Both are checked before
    /// anything is dispatched. Returns an operation error for the first
    /// failing invocation.
    pub async fn run(
        &mut self,
        definition: PipelineDefinition,
        design: &mut dyn DesignGraph,
        range: LabelRange,
    ) -> Result<RunSummary, SynthflowError> {
        if definition.mode() == RunMode::Describe {
            return self.describe(definition, range);
        }

        definition.check_range(range)?;
        if !design.is_fully_selected() {
            return Err(ConfigurationError::PartialSelection.into());
        }

        self.state = RunState::Running;
        let result = self.execute(&definition, design, range).await;
        self.state = RunState::Idle;
        result
    }

    /// Renders `definition` over `range` without dispatching anything.
    ///
    /// The definition must have been built in describe mode so that its
    /// arguments carry the `<top>` and `<file-name>` placeholders.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `definition` was built in execute
    /// mode or a bound of `range` has no stage.
    pub fn describe(
        &mut self,
        definition: PipelineDefinition,
        range: LabelRange,
    ) -> Result<RunSummary, SynthflowError> {
        if definition.mode() != RunMode::Describe {
            return Err(ConfigurationError::ModeMismatch {
                built: definition.mode(),
                requested: RunMode::Describe,
            }
            .into());
        }
        definition.check_range(range)?;

        self.state = RunState::Running;
        let mut summary = start_summary(&definition, RunMode::Describe, range);

        for stage in definition.stages_in(range) {
            summary.stages.push(stage.label());
            for invocation in stage.planned() {
                let status = if invocation.is_included() {
                    InvocationStatus::Described
                } else {
                    InvocationStatus::Skipped
                };
                summary.records.push(record(stage.label(), invocation, status, 0));
            }
        }

        summary.report = Some(definition.report(range));
        summary.finished_at = Utc::now();
        self.state = RunState::Idle;

        debug!(run_id = %summary.run_id, range = %range, "Plan described");
        Ok(summary)
    }

    async fn execute(
        &self,
        definition: &PipelineDefinition,
        design: &mut dyn DesignGraph,
        range: LabelRange,
    ) -> Result<RunSummary, SynthflowError> {
        let mut summary = start_summary(definition, RunMode::Execute, range);
        let run_id = summary.run_id;

        info!(run_id = %run_id, family = %definition.family(), range = %range, "Run started");
        self.sink
            .emit(
                RunEvent::RunStarted,
                Some(json!({
                    "run_id": run_id.to_string(),
                    "family": definition.family().as_str(),
                    "range": range.to_string(),
                    "fingerprint": summary.fingerprint,
                })),
            )
            .await;

        for stage in definition.stages_in(range) {
            let label = stage.label();
            debug!(run_id = %run_id, label = %label, "Stage started");
            self.sink
                .emit(RunEvent::StageStarted, Some(json!({ "label": label.as_str() })))
                .await;
            summary.stages.push(label);

            for invocation in stage.planned() {
                if let Some(annotation) = invocation.skip_annotation() {
                    trace!(label = %label, command = %invocation, annotation, "Invocation skipped");
                    self.sink
                        .emit(
                            RunEvent::InvocationSkipped,
                            Some(json!({
                                "label": label.as_str(),
                                "command": invocation.command_line(),
                                "annotation": annotation,
                            })),
                        )
                        .await;
                    summary
                        .records
                        .push(record(label, invocation, InvocationStatus::Skipped, 0));
                    continue;
                }

                let started = Instant::now();
                let outcome = self.dispatcher.dispatch(label, invocation, design).await;
                let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                if let Err(err) = outcome {
                    summary
                        .records
                        .push(record(label, invocation, InvocationStatus::Failed, elapsed));
                    self.sink
                        .emit(
                            RunEvent::InvocationFailed,
                            Some(json!({
                                "label": label.as_str(),
                                "command": invocation.command_line(),
                                "error": err.source.to_string(),
                            })),
                        )
                        .await;
                    warn!(run_id = %run_id, label = %label, "Run aborted");
                    self.sink
                        .emit(
                            RunEvent::RunFailed,
                            Some(json!({
                                "run_id": run_id.to_string(),
                                "label": label.as_str(),
                                "dispatched": summary.dispatched_count(),
                            })),
                        )
                        .await;
                    return Err(err.into());
                }

                self.sink
                    .emit(
                        RunEvent::InvocationDispatched,
                        Some(json!({
                            "label": label.as_str(),
                            "command": invocation.command_line(),
                            "duration_ms": elapsed,
                        })),
                    )
                    .await;
                summary
                    .records
                    .push(record(label, invocation, InvocationStatus::Dispatched, elapsed));
            }

            self.sink
                .emit(RunEvent::StageCompleted, Some(json!({ "label": label.as_str() })))
                .await;
        }

        summary.finished_at = Utc::now();
        info!(
            run_id = %run_id,
            dispatched = summary.dispatched_count(),
            duration_ms = summary.duration_ms(),
            "Run completed"
        );
        self.sink
            .emit(
                RunEvent::RunCompleted,
                Some(json!({
                    "run_id": run_id.to_string(),
                    "dispatched": summary.dispatched_count(),
                    "duration_ms": summary.duration_ms(),
                })),
            )
            .await;

        Ok(summary)
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn start_summary(definition: &PipelineDefinition, mode: RunMode, range: LabelRange) -> RunSummary {
    let now = Utc::now();
    RunSummary {
        run_id: Uuid::new_v4(),
        family: definition.family(),
        mode,
        range,
        fingerprint: definition.fingerprint(),
        stages: Vec::new(),
        records: Vec::new(),
        report: None,
        started_at: now,
        finished_at: now,
    }
}

fn record(
    label: Label,
    invocation: &Invocation,
    status: InvocationStatus,
    duration_ms: u64,
) -> InvocationRecord {
    InvocationRecord {
        label,
        operation: invocation.operation().to_string(),
        arguments: invocation.arguments().to_string(),
        status,
        duration_ms,
    }
}
