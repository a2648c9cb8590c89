//! Stage declarations and resolved stages.

use super::invocation::{Gate, Invocation, InvocationSpec};
use crate::config::SynthConfig;
use crate::core::Label;
use crate::errors::PlanningError;
use serde::{Deserialize, Serialize};

/// A stage as declared by a pipeline script.
#[derive(Debug, Clone)]
pub struct StageSpec {
    label: Label,
    invocations: Vec<InvocationSpec>,
}

impl StageSpec {
    /// Creates an empty stage.
    #[must_use]
    pub fn new(label: Label) -> Self {
        Self {
            label,
            invocations: Vec::new(),
        }
    }

    /// Returns the stage label.
    #[must_use]
    pub const fn label(&self) -> Label {
        self.label
    }

    /// Returns the declared invocations.
    #[must_use]
    pub fn invocations(&self) -> &[InvocationSpec] {
        &self.invocations
    }

    /// Opens a declaration scope on this stage.
    pub fn scope(&mut self) -> StageScope<'_> {
        StageScope {
            invocations: &mut self.invocations,
            gates: Vec::new(),
        }
    }

    /// Resolves every declared invocation against `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Predicate`] if a gate cannot be evaluated.
    pub fn resolve(&self, config: &SynthConfig) -> Result<Stage, PlanningError> {
        let mut invocations = Vec::with_capacity(self.invocations.len());

        for spec in &self.invocations {
            let planned = spec.plan(config).map_err(|source| PlanningError::Predicate {
                label: self.label,
                operation: spec.operation().to_string(),
                arguments: spec.arguments().to_string(),
                source,
            })?;
            invocations.extend(planned);
        }

        Ok(Stage {
            label: self.label,
            invocations,
        })
    }
}

/// Declares invocations into a stage under the gates of enclosing
/// [`StageScope::when`] blocks.
pub struct StageScope<'a> {
    invocations: &'a mut Vec<InvocationSpec>,
    gates: Vec<Gate>,
}

impl StageScope<'_> {
    /// Declares one invocation.
    pub fn run(&mut self, operation: impl Into<String>, arguments: impl Into<String>) -> &mut Self {
        let spec = InvocationSpec::new(operation, arguments).with_gates(self.gates.iter().cloned());
        self.invocations.push(spec);
        self
    }

    /// Declares a group of invocations guarded by `gate`.
    pub fn when(&mut self, gate: Gate, declare: impl FnOnce(&mut StageScope<'_>)) -> &mut Self {
        let mut gates = self.gates.clone();
        gates.push(gate);

        let mut inner = StageScope {
            invocations: &mut *self.invocations,
            gates,
        };
        declare(&mut inner);
        self
    }
}

/// A resolved stage: a label and its planned invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    label: Label,
    invocations: Vec<Invocation>,
}

impl Stage {
    /// Returns the stage label.
    #[must_use]
    pub const fn label(&self) -> Label {
        self.label
    }

    /// Returns every planned invocation, skipped ones included.
    #[must_use]
    pub fn planned(&self) -> &[Invocation] {
        &self.invocations
    }

    /// Iterates over the invocations to dispatch.
    pub fn included(&self) -> impl Iterator<Item = &Invocation> {
        self.invocations.iter().filter(|inv| inv.is_included())
    }

    /// Returns true if nothing is planned for this stage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }
}
