//! Pipeline builder with validation.

use super::definition::PipelineDefinition;
use super::stage::{StageScope, StageSpec};
use crate::config::SynthConfig;
use crate::core::Label;
use crate::errors::PlanningError;
use tracing::info;

/// Builder for creating validated pipeline definitions.
///
/// Stages are declared once each, in label order; [`Self::build`] resolves
/// every declared invocation against one configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    /// The stage declarations, in declaration order.
    stages: Vec<StageSpec>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a stage and its invocations.
    #[must_use]
    pub fn stage(mut self, label: Label, declare: impl FnOnce(&mut StageScope<'_>)) -> Self {
        let mut spec = StageSpec::new(label);
        declare(&mut spec.scope());
        self.stages.push(spec);
        self
    }

    /// Returns the declared stages.
    #[must_use]
    pub fn stage_specs(&self) -> &[StageSpec] {
        &self.stages
    }

    /// Validates the stage list.
    ///
    /// # Errors
    ///
    /// Returns an error if a label is declared out of order or twice, or if
    /// a label has no stage.
    pub fn validate(&self) -> Result<(), PlanningError> {
        for pair in self.stages.windows(2) {
            let (previous, label) = (pair[0].label(), pair[1].label());
            if label <= previous {
                return Err(PlanningError::LabelOutOfOrder { label, previous });
            }
        }

        for label in Label::ALL {
            if !self.stages.iter().any(|s| s.label() == label) {
                return Err(PlanningError::MissingLabel { label });
            }
        }

        Ok(())
    }

    /// Validates the stage list and resolves it against `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or a predicate cannot be
    /// evaluated.
    pub fn build(&self, config: &SynthConfig) -> Result<PipelineDefinition, PlanningError> {
        self.validate()?;

        let stages = self
            .stages
            .iter()
            .map(|spec| spec.resolve(config))
            .collect::<Result<Vec<_>, _>>()?;

        let definition = PipelineDefinition::new(config.family(), config.mode(), stages);
        info!(
            family = %config.family(),
            mode = %config.mode(),
            stages = definition.stages().len(),
            fingerprint = %definition.fingerprint(),
            "Pipeline definition built"
        );
        Ok(definition)
    }
}
