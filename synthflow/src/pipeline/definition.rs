//! Resolved pipeline definitions.

use super::report::PlanReport;
use super::stage::Stage;
use crate::core::{Label, LabelRange, RunMode, TargetFamily};
use crate::errors::ConfigurationError;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// The fully resolved plan for one run.
///
/// Built fresh from a configuration, handed to a runner, and dropped with
/// it. Deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PipelineDefinition {
    family: TargetFamily,
    mode: RunMode,
    stages: Vec<Stage>,
}

impl PipelineDefinition {
    pub(crate) fn new(family: TargetFamily, mode: RunMode, stages: Vec<Stage>) -> Self {
        Self {
            family,
            mode,
            stages,
        }
    }

    /// Returns the family the plan was built for.
    #[must_use]
    pub const fn family(&self) -> TargetFamily {
        self.family
    }

    /// Returns the mode of the configuration the plan was built from.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Returns every stage, in label order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Looks a stage up by label.
    #[must_use]
    pub fn stage(&self, label: Label) -> Option<&Stage> {
        self.stages.iter().find(|s| s.label() == label)
    }

    /// Returns the labels, in order.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        self.stages.iter().map(Stage::label).collect()
    }

    /// Returns true if `label` has a stage.
    #[must_use]
    pub fn contains(&self, label: Label) -> bool {
        self.stage(label).is_some()
    }

    /// Checks that both ends of `range` are addressable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::LabelNotInPipeline`] for the first
    /// missing bound.
    pub fn check_range(&self, range: LabelRange) -> Result<(), ConfigurationError> {
        for label in [range.start(), range.end()] {
            if !self.contains(label) {
                return Err(ConfigurationError::LabelNotInPipeline { label });
            }
        }
        Ok(())
    }

    /// Iterates over the stages within `range`.
    pub fn stages_in(&self, range: LabelRange) -> impl Iterator<Item = &Stage> {
        self.stages.iter().filter(move |s| range.contains(s.label()))
    }

    /// Renders the plan for `range`.
    #[must_use]
    pub fn report(&self, range: LabelRange) -> PlanReport {
        PlanReport::render(self.stages_in(range))
    }

    /// Returns a short stable digest of the full plan.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let report = self.report(LabelRange::full());
        let mut hasher = Sha256::new();
        hasher.update(self.family.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(report.as_str().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthConfig;
    use crate::pipeline::PipelineBuilder;

    fn definition() -> PipelineDefinition {
        Label::ALL
            .into_iter()
            .fold(PipelineBuilder::new(), |b, label| {
                b.stage(label, |s| {
                    s.run("echo", label.as_str());
                })
            })
            .build(&SynthConfig::new(TargetFamily::QlfK6n10))
            .unwrap()
    }

    #[test]
    fn test_stages_in_range() {
        let definition = definition();
        let range = LabelRange::new(Label::MapBram, Label::MapGates).unwrap();
        let labels: Vec<Label> = definition.stages_in(range).map(Stage::label).collect();
        assert_eq!(labels, vec![Label::MapBram, Label::MapFfram, Label::MapGates]);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = definition().fingerprint();
        let b = definition().fingerprint();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_check_range() {
        let definition = definition();
        assert!(definition.check_range(LabelRange::full()).is_ok());

        let partial = PipelineDefinition::new(TargetFamily::Pp3, RunMode::Execute, Vec::new());
        assert_eq!(
            partial.check_range(LabelRange::single(Label::Check)).unwrap_err(),
            ConfigurationError::LabelNotInPipeline {
                label: Label::Check
            }
        );
    }
}
