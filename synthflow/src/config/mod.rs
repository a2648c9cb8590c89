//! Run configuration.
//!
//! This module provides:
//! - Raw [`SynthOptions`] (from an option vector or JSON)
//! - The resolved, immutable [`SynthConfig`] the planner consumes
//! - Feature toggles and output artifacts

mod args;
mod flags;
mod options;

pub use args::{help_text, parse_args};
pub use flags::{Feature, FeatureFlags, OutputFiles, OutputKind};
pub use options::SynthOptions;

use crate::core::{RunMode, TargetFamily};
use crate::errors::{ConfigurationError, PredicateError};
use serde::Serialize;

/// Placeholder for the top module when it is only known after elaboration.
pub const TOP_PLACEHOLDER: &str = "<top>";

/// Placeholder for an output path that was not requested.
pub const FILE_PLACEHOLDER: &str = "<file-name>";

/// A validated configuration snapshot for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthConfig {
    family: TargetFamily,
    features: FeatureFlags,
    top: Option<String>,
    outputs: OutputFiles,
    mode: RunMode,
}

impl SynthConfig {
    /// Creates an execute-mode configuration with default features.
    #[must_use]
    pub fn new(family: TargetFamily) -> Self {
        Self {
            family,
            features: FeatureFlags::default(),
            top: None,
            outputs: OutputFiles::default(),
            mode: RunMode::Execute,
        }
        .normalized()
    }

    /// Validates raw options into a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the family is not supported.
    pub fn resolve(options: &SynthOptions) -> Result<Self, ConfigurationError> {
        let family = options.family.parse::<TargetFamily>()?;
        let mode = if options.describe {
            RunMode::Describe
        } else {
            RunMode::Execute
        };

        Ok(Self {
            family,
            features: options.features,
            top: options.top.clone().filter(|top| !top.is_empty()),
            outputs: options.outputs.clone().normalized(),
            mode,
        }
        .normalized())
    }

    /// Sets a feature.
    #[must_use]
    pub fn with_feature(mut self, feature: Feature, on: bool) -> Self {
        self.features.set(feature, on);
        self.normalized()
    }

    /// Sets the top module.
    #[must_use]
    pub fn with_top(mut self, top: impl Into<String>) -> Self {
        self.top = Some(top.into()).filter(|top| !top.is_empty());
        self
    }

    /// Requests an output artifact.
    #[must_use]
    pub fn with_output(mut self, kind: OutputKind, path: impl Into<String>) -> Self {
        self.outputs.set(kind, path);
        self.outputs = self.outputs.normalized();
        self
    }

    /// Sets the run mode.
    #[must_use]
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the target family.
    #[must_use]
    pub const fn family(&self) -> TargetFamily {
        self.family
    }

    /// Returns the run mode.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Returns true in describe mode.
    #[must_use]
    pub fn is_describe(&self) -> bool {
        self.mode == RunMode::Describe
    }

    /// Returns the feature flags after family normalization.
    #[must_use]
    pub const fn features(&self) -> &FeatureFlags {
        &self.features
    }

    /// Returns the configured top module, if any.
    #[must_use]
    pub fn top(&self) -> Option<&str> {
        self.top.as_deref()
    }

    /// Returns the requested outputs.
    #[must_use]
    pub const fn outputs(&self) -> &OutputFiles {
        &self.outputs
    }

    /// Returns true if `kind` is to be written.
    #[must_use]
    pub fn wants(&self, kind: OutputKind) -> bool {
        self.outputs.get(kind).is_some()
    }

    /// Queries a feature from an inclusion predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature has no meaning for the family.
    pub fn enabled(&self, feature: Feature) -> Result<bool, PredicateError> {
        if !feature.applies_to(self.family) {
            return Err(PredicateError::FeatureNotApplicable {
                feature,
                family: self.family,
            });
        }
        Ok(self.features.get(feature))
    }

    /// Returns the `hierarchy` top selection argument.
    ///
    /// Without a configured top the executor picks one itself; a describe
    /// run shows the placeholder instead.
    #[must_use]
    pub fn top_argument(&self) -> String {
        match (&self.top, self.mode) {
            (Some(top), _) => format!("-top {top}"),
            (None, RunMode::Describe) => format!("-top {TOP_PLACEHOLDER}"),
            (None, RunMode::Execute) => "-auto-top".to_string(),
        }
    }

    /// Returns the module name handed to netlist writers, if one is known.
    #[must_use]
    pub fn top_module_name(&self) -> Option<&str> {
        match self.mode {
            RunMode::Describe => Some(self.top().unwrap_or(TOP_PLACEHOLDER)),
            RunMode::Execute => self.top(),
        }
    }

    /// Returns the output path for `kind`, or the placeholder.
    #[must_use]
    pub fn output_argument(&self, kind: OutputKind) -> &str {
        self.outputs.get(kind).unwrap_or(FILE_PLACEHOLDER)
    }

    fn normalized(mut self) -> Self {
        for feature in Feature::ALL {
            if !feature.applies_to(self.family) {
                self.features.set(feature, false);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = SynthConfig::resolve(&SynthOptions::default()).unwrap();
        assert_eq!(config.family(), TargetFamily::QlfK4n8);
        assert_eq!(config.mode(), RunMode::Execute);
        assert!(config.top().is_none());
    }

    #[test]
    fn test_resolve_rejects_unknown_family() {
        let options = SynthOptions::default().with_family("qlf_k5n9");
        let err = SynthConfig::resolve(&options).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidFamily {
                value: "qlf_k5n9".to_string()
            }
        );
    }

    #[test]
    fn test_abc9_forced_off_outside_pp3() {
        let config = SynthConfig::new(TargetFamily::QlfK6n10);
        assert!(!config.features().abc9);

        let config = config.with_feature(Feature::Abc9, true);
        assert!(!config.features().abc9);

        let config = SynthConfig::new(TargetFamily::Pp3);
        assert!(config.features().abc9);
    }

    #[test]
    fn test_enabled_rejects_inapplicable_feature() {
        let config = SynthConfig::new(TargetFamily::QlfK4n8);
        assert!(config.enabled(Feature::Dsp).unwrap());
        assert_eq!(
            config.enabled(Feature::Abc9).unwrap_err(),
            PredicateError::FeatureNotApplicable {
                feature: Feature::Abc9,
                family: TargetFamily::QlfK4n8,
            }
        );
    }

    #[test]
    fn test_empty_strings_mean_absent() {
        let mut options = SynthOptions::default().with_top("");
        options.outputs.set(OutputKind::Edif, "");
        let config = SynthConfig::resolve(&options).unwrap();

        assert!(config.top().is_none());
        assert!(!config.wants(OutputKind::Edif));
    }

    #[test]
    fn test_top_argument_by_mode() {
        let config = SynthConfig::new(TargetFamily::Pp3);
        assert_eq!(config.top_argument(), "-auto-top");
        assert_eq!(config.top_module_name(), None);

        let config = config.with_mode(RunMode::Describe);
        assert_eq!(config.top_argument(), "-top <top>");
        assert_eq!(config.top_module_name(), Some("<top>"));

        let config = config.with_top("chip");
        assert_eq!(config.top_argument(), "-top chip");
        assert_eq!(config.top_module_name(), Some("chip"));
    }

    #[test]
    fn test_output_argument_placeholder() {
        let config = SynthConfig::new(TargetFamily::QlfK4n8).with_output(OutputKind::Blif, "a.blif");
        assert_eq!(config.output_argument(OutputKind::Blif), "a.blif");
        assert_eq!(config.output_argument(OutputKind::Verilog), "<file-name>");
    }
}
