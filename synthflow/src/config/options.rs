//! Raw, unvalidated synthesis options.

use super::{FeatureFlags, OutputFiles};
use crate::core::TargetFamily;
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options as supplied by the caller, before validation.
///
/// The family is kept as a string here; [`super::SynthConfig::resolve`]
/// turns it into a [`TargetFamily`] or rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthOptions {
    /// Target family name.
    #[serde(default = "default_family")]
    pub family: String,
    /// Top module; `None` or empty means auto-detect.
    #[serde(default)]
    pub top: Option<String>,
    /// Feature toggles.
    #[serde(default)]
    pub features: FeatureFlags,
    /// Requested netlist artifacts.
    #[serde(default)]
    pub outputs: OutputFiles,
    /// Render the plan instead of running it.
    #[serde(default)]
    pub describe: bool,
    /// First label to run.
    #[serde(default)]
    pub run_from: Option<String>,
    /// Last label to run.
    #[serde(default)]
    pub run_to: Option<String>,
}

fn default_family() -> String {
    TargetFamily::default().as_str().to_string()
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            family: default_family(),
            top: None,
            features: FeatureFlags::default(),
            outputs: OutputFiles::default(),
            describe: false,
            run_from: None,
            run_to: None,
        }
    }
}

impl SynthOptions {
    /// Creates options with every default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the family name.
    #[must_use]
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Sets the top module.
    #[must_use]
    pub fn with_top(mut self, top: impl Into<String>) -> Self {
        self.top = Some(top.into());
        self
    }

    /// Sets describe mode.
    #[must_use]
    pub fn with_describe(mut self, describe: bool) -> Self {
        self.describe = describe;
        self
    }

    /// Sets the label bounds.
    #[must_use]
    pub fn with_run_range(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.run_from = from.map(str::to_string);
        self.run_to = to.map(str::to_string);
        self
    }

    /// Parses options from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid options JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Load {
            source_name: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Reads options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let load_error = |message: String| ConfigurationError::Load {
            source_name: path.display().to_string(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| load_error(e.to_string()))
    }
}
