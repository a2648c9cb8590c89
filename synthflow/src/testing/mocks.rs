//! Executor and design doubles.

use crate::dispatch::{DesignGraph, OperationExecutor};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// An executor that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(String, String)>>,
    fail_on: Mutex<Option<String>>,
}

impl RecordingExecutor {
    /// Creates an executor that accepts every invocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor that fails the first time `operation` is invoked.
    #[must_use]
    pub fn failing_on(operation: impl Into<String>) -> Self {
        let executor = Self::default();
        executor.fail_on(operation);
        executor
    }

    /// Fails the next invocation of `operation`.
    pub fn fail_on(&self, operation: impl Into<String>) {
        *self.fail_on.lock() = Some(operation.into());
    }

    /// Returns every (operation, arguments) pair received, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    /// Returns every call as a command line.
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|(op, args)| {
                if args.is_empty() {
                    op.clone()
                } else {
                    format!("{op} {args}")
                }
            })
            .collect()
    }

    /// Returns the number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Forgets recorded calls.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl OperationExecutor for RecordingExecutor {
    async fn invoke(
        &self,
        operation: &str,
        arguments: &str,
        _design: &mut dyn DesignGraph,
    ) -> anyhow::Result<()> {
        self.calls
            .lock()
            .push((operation.to_string(), arguments.to_string()));

        let mut fail_on = self.fail_on.lock();
        if fail_on.as_deref() == Some(operation) {
            *fail_on = None;
            anyhow::bail!("{operation} failed");
        }
        Ok(())
    }
}

/// A design with a selection flag and an integer scratchpad.
#[derive(Debug, Clone)]
pub struct InMemoryDesign {
    fully_selected: bool,
    scratchpad: HashMap<String, i64>,
}

impl Default for InMemoryDesign {
    fn default() -> Self {
        Self {
            fully_selected: true,
            scratchpad: HashMap::new(),
        }
    }
}

impl InMemoryDesign {
    /// Creates a fully selected design with an empty scratchpad.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a design with only part of it selected.
    #[must_use]
    pub fn partially_selected() -> Self {
        Self {
            fully_selected: false,
            ..Self::default()
        }
    }

    /// Presets a scratchpad entry.
    #[must_use]
    pub fn with_scratchpad(mut self, key: impl Into<String>, value: i64) -> Self {
        self.scratchpad.insert(key.into(), value);
        self
    }
}

impl DesignGraph for InMemoryDesign {
    fn is_fully_selected(&self) -> bool {
        self.fully_selected
    }

    fn scratchpad_int(&self, key: &str) -> Option<i64> {
        self.scratchpad.get(key).copied()
    }

    fn set_scratchpad_int(&mut self, key: &str, value: i64) {
        self.scratchpad.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_executor_fails_once() {
        let executor = RecordingExecutor::failing_on("stat");
        let mut design = InMemoryDesign::new();

        executor.invoke("proc", "", &mut design).await.unwrap();
        assert!(executor.invoke("stat", "", &mut design).await.is_err());
        executor.invoke("stat", "", &mut design).await.unwrap();

        assert_eq!(executor.command_lines(), vec!["proc", "stat", "stat"]);
        executor.reset();
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn test_in_memory_design_scratchpad() {
        let mut design = InMemoryDesign::new().with_scratchpad("abc9.D", 5000);
        assert!(design.is_fully_selected());
        assert_eq!(design.scratchpad_int("abc9.D"), Some(5000));

        design.set_scratchpad_int("abc9.D", 41667);
        assert_eq!(design.scratchpad_int("abc9.D"), Some(41667));
        assert!(!InMemoryDesign::partially_selected().is_fully_selected());
    }
}
