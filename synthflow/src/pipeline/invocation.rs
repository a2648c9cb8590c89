//! Declared and resolved invocations.

use crate::config::{Feature, OutputKind, SynthConfig};
use crate::core::TargetFamily;
use crate::errors::PredicateError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A pure inclusion test over the configuration.
pub type Predicate = Arc<dyn Fn(&SynthConfig) -> Result<bool, PredicateError> + Send + Sync>;

/// One condition guarding a group of invocations.
///
/// A gate with an annotation is a *feature* gate: when it fails, the guarded
/// invocations stay in the plan as skipped and describe mode shows the
/// annotation. A gate without one is *structural*: when it fails the
/// invocations are omitted from the plan entirely.
#[derive(Clone)]
pub struct Gate {
    annotation: Option<Cow<'static, str>>,
    predicate: Predicate,
}

impl Gate {
    /// Creates a feature gate with a skip annotation.
    pub fn new<F>(annotation: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&SynthConfig) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self {
            annotation: Some(annotation.into()),
            predicate: Arc::new(predicate),
        }
    }

    /// Creates a structural gate.
    pub fn structural<F>(predicate: F) -> Self
    where
        F: Fn(&SynthConfig) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self {
            annotation: None,
            predicate: Arc::new(predicate),
        }
    }

    /// Holds only for the listed families.
    #[must_use]
    pub fn families(families: &'static [TargetFamily]) -> Self {
        Self::structural(move |config| Ok(families.contains(&config.family())))
    }

    /// Holds while `feature` is on.
    #[must_use]
    pub fn feature(feature: Feature) -> Self {
        Self::new(format!("(skip if {})", feature.disable_switch()), move |config| {
            config.enabled(feature)
        })
    }

    /// Holds while `feature` is off.
    #[must_use]
    pub fn without(feature: Feature) -> Self {
        Self::new(format!("(if {})", feature.disable_switch()), move |config| {
            config.enabled(feature).map(|on| !on)
        })
    }

    /// Holds when the `kind` artifact was requested.
    #[must_use]
    pub fn output(kind: OutputKind) -> Self {
        Self::new(format!("(skip if no {})", kind.switch()), move |config| {
            Ok(config.wants(kind))
        })
    }

    /// Returns the skip annotation, if this is a feature gate.
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Evaluates the predicate.
    ///
    /// # Errors
    ///
    /// Propagates the predicate's error.
    pub fn evaluate(&self, config: &SynthConfig) -> Result<bool, PredicateError> {
        (self.predicate)(config)
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("annotation", &self.annotation)
            .finish_non_exhaustive()
    }
}

/// How a declared invocation resolved against a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inclusion {
    /// Every gate holds.
    Included,
    /// A feature gate failed; carries its annotation.
    Skipped(String),
    /// A structural gate failed.
    Omitted,
}

/// An invocation as declared by a pipeline script, before resolution.
#[derive(Debug, Clone)]
pub struct InvocationSpec {
    operation: String,
    arguments: String,
    gates: Vec<Gate>,
}

impl InvocationSpec {
    /// Creates an ungated invocation.
    #[must_use]
    pub fn new(operation: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            arguments: arguments.into(),
            gates: Vec::new(),
        }
    }

    /// Adds gates, outermost first.
    #[must_use]
    pub fn with_gates(mut self, gates: impl IntoIterator<Item = Gate>) -> Self {
        self.gates.extend(gates);
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the argument string.
    #[must_use]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Returns the gates, outermost first.
    #[must_use]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Evaluates the gates, outermost first.
    ///
    /// A failing structural gate omits the invocation immediately, so inner
    /// gates that only make sense for some families are never evaluated for
    /// the others. Otherwise the first failing feature gate decides the skip
    /// annotation.
    ///
    /// # Errors
    ///
    /// Propagates the first predicate error encountered.
    pub fn resolve(&self, config: &SynthConfig) -> Result<Inclusion, PredicateError> {
        let mut skipped: Option<&str> = None;

        for gate in &self.gates {
            if gate.evaluate(config)? {
                continue;
            }
            match gate.annotation() {
                None => return Ok(Inclusion::Omitted),
                Some(annotation) => {
                    skipped.get_or_insert(annotation);
                }
            }
        }

        Ok(match skipped {
            Some(annotation) => Inclusion::Skipped(annotation.to_string()),
            None => Inclusion::Included,
        })
    }

    /// Resolves into a planned invocation, or `None` when omitted.
    ///
    /// # Errors
    ///
    /// Propagates the first predicate error encountered.
    pub fn plan(&self, config: &SynthConfig) -> Result<Option<Invocation>, PredicateError> {
        Ok(match self.resolve(config)? {
            Inclusion::Included => Some(Invocation::included(&self.operation, &self.arguments)),
            Inclusion::Skipped(annotation) => Some(Invocation::skipped(
                &self.operation,
                &self.arguments,
                annotation,
            )),
            Inclusion::Omitted => None,
        })
    }
}

/// A resolved invocation in a pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    operation: String,
    arguments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skip_annotation: Option<String>,
}

impl Invocation {
    /// Creates an included invocation.
    #[must_use]
    pub fn included(operation: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            arguments: arguments.into(),
            skip_annotation: None,
        }
    }

    /// Creates a skipped invocation.
    #[must_use]
    pub fn skipped(
        operation: impl Into<String>,
        arguments: impl Into<String>,
        annotation: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            arguments: arguments.into(),
            skip_annotation: Some(annotation.into()),
        }
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the argument string, verbatim.
    #[must_use]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Returns the skip annotation of an excluded invocation.
    #[must_use]
    pub fn skip_annotation(&self) -> Option<&str> {
        self.skip_annotation.as_deref()
    }

    /// Returns true if the invocation is to be dispatched.
    #[must_use]
    pub fn is_included(&self) -> bool {
        self.skip_annotation.is_none()
    }

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

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(family: TargetFamily) -> SynthConfig {
        SynthConfig::new(family)
    }

    #[test]
    fn test_ungated_is_included() {
        let spec = InvocationSpec::new("opt", "-fast");
        assert_eq!(spec.resolve(&config(TargetFamily::Pp3)).unwrap(), Inclusion::Included);
    }

    #[test]
    fn test_family_gate_omits() {
        let spec = InvocationSpec::new("tribuf", "-logic")
            .with_gates([Gate::families(&[TargetFamily::Pp3])]);

        assert_eq!(spec.resolve(&config(TargetFamily::Pp3)).unwrap(), Inclusion::Included);
        assert_eq!(
            spec.resolve(&config(TargetFamily::QlfK4n8)).unwrap(),
            Inclusion::Omitted
        );
        assert!(spec.plan(&config(TargetFamily::QlfK4n8)).unwrap().is_none());
    }

    #[test]
    fn test_feature_gate_skips_with_annotation() {
        let spec = InvocationSpec::new("ql_dsp", "").with_gates([Gate::feature(Feature::Dsp)]);
        let off = config(TargetFamily::QlfK6n10).with_feature(Feature::Dsp, false);

        assert_eq!(
            spec.resolve(&off).unwrap(),
            Inclusion::Skipped("(skip if -no_dsp)".to_string())
        );
        let planned = spec.plan(&off).unwrap().unwrap();
        assert!(!planned.is_included());
        assert_eq!(planned.skip_annotation(), Some("(skip if -no_dsp)"));
    }

    #[test]
    fn test_structural_gate_wins_over_feature_gate() {
        let spec = InvocationSpec::new("memory_bram", "")
            .with_gates([Gate::feature(Feature::Bram), Gate::families(&[TargetFamily::Pp3])]);
        let off = config(TargetFamily::QlfK4n8).with_feature(Feature::Bram, false);

        assert_eq!(spec.resolve(&off).unwrap(), Inclusion::Omitted);
    }

    #[test]
    fn test_structural_gate_shields_inner_predicates() {
        let spec = InvocationSpec::new("abc9", "-maxlut 4 -dff").with_gates([
            Gate::families(&[TargetFamily::Pp3]),
            Gate::feature(Feature::Abc9),
        ]);

        assert_eq!(
            spec.resolve(&config(TargetFamily::QlfK6n10)).unwrap(),
            Inclusion::Omitted
        );
        assert_eq!(spec.resolve(&config(TargetFamily::Pp3)).unwrap(), Inclusion::Included);
    }

    #[test]
    fn test_unshielded_predicate_error() {
        let spec = InvocationSpec::new("abc9", "").with_gates([Gate::feature(Feature::Abc9)]);
        assert!(spec.resolve(&config(TargetFamily::QlfK4n8)).is_err());
    }

    #[test]
    fn test_without_gate() {
        let spec = InvocationSpec::new("techmap", "").with_gates([Gate::without(Feature::Adder)]);
        let on = config(TargetFamily::QlfK4n8);
        let off = on.clone().with_feature(Feature::Adder, false);

        assert_eq!(
            spec.resolve(&on).unwrap(),
            Inclusion::Skipped("(if -no_adder)".to_string())
        );
        assert_eq!(spec.resolve(&off).unwrap(), Inclusion::Included);
    }

    #[test]
    fn test_command_line() {
        assert_eq!(Invocation::included("proc", "").command_line(), "proc");
        assert_eq!(
            Invocation::included("opt", "-undriven -fine").to_string(),
            "opt -undriven -fine"
        );
    }
}
