//! Invocation dispatch.
//!
//! The orchestrator never touches the design itself. Every included
//! invocation is handed to an [`OperationExecutor`] together with the
//! mutably borrowed [`DesignGraph`].

use crate::core::Label;
use crate::errors::OperationError;
use crate::pipeline::Invocation;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

/// The in-memory design the operations transform.
#[cfg_attr(test, mockall::automock)]
pub trait DesignGraph: Send {
    /// Returns true if the whole design is selected.
    fn is_fully_selected(&self) -> bool;

    /// Reads an integer from the design scratchpad.
    fn scratchpad_int(&self, key: &str) -> Option<i64>;

    /// Writes an integer to the design scratchpad.
    fn set_scratchpad_int(&mut self, key: &str, value: i64);
}

/// Runs one named transformation on the design.
#[async_trait]
pub trait OperationExecutor: Send + Sync {
    /// Runs `operation` with its argument string.
    ///
    /// Share paths are passed unexpanded as `+/...`, also where they sit
    /// inside a larger argument such as the `-script` string given to
    /// `abc`. Resolving them against the share directory is up to the
    /// executor.
    ///
    /// # Errors
    ///
    /// Any error aborts the run.
    async fn invoke(
        &self,
        operation: &str,
        arguments: &str,
        design: &mut dyn DesignGraph,
    ) -> anyhow::Result<()>;
}

/// Maps planned invocations onto an executor.
#[derive(Clone)]
pub struct Dispatcher {
    executor: Arc<dyn OperationExecutor>,
}

impl Dispatcher {
    /// Creates a dispatcher over `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn OperationExecutor>) -> Self {
        Self { executor }
    }

    /// Dispatches one invocation.
    ///
    /// # Errors
    ///
    /// Wraps an executor failure with the stage and invocation context.
    pub async fn dispatch(
        &self,
        label: Label,
        invocation: &Invocation,
        design: &mut dyn DesignGraph,
    ) -> Result<(), OperationError> {
        debug!(label = %label, command = %invocation, "Dispatching invocation");

        self.executor
            .invoke(invocation.operation(), invocation.arguments(), design)
            .await
            .map_err(|source| {
                error!(label = %label, command = %invocation, error = %source, "Invocation failed");
                OperationError::new(label, invocation.operation(), invocation.arguments(), source)
            })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
