//! Error types for synthflow.
//!
//! Every failure falls into one of three kinds:
//! - [`ConfigurationError`]: rejected before any stage runs
//! - [`PlanningError`]: raised while the pipeline definition is built
//! - [`OperationError`]: an external operation failed mid-run

use crate::config::Feature;
use crate::core::{Label, RunMode, TargetFamily};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for synthflow operations.
#[derive(Debug, Error)]
pub enum SynthflowError {
    /// The options, label range or design handle were rejected.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// The pipeline definition could not be built.
    #[error("{0}")]
    Planning(#[from] PlanningError),

    /// An external operation failed.
    #[error("{0}")]
    Operation(#[from] OperationError),
}

impl SynthflowError {
    /// Returns the structured diagnostic for this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        match self {
            Self::Configuration(err) => err.error_info(),
            Self::Planning(err) => err.error_info(),
            Self::Operation(err) => err.error_info(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = self.error_info().to_dict();
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Stable code, summary and fix hint for an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorInfo {
    /// Error code (e.g., "CONFIG-001-FAMILY").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::Value::String(self.code.clone()));
        map.insert("summary".to_string(), serde_json::Value::String(self.summary.clone()));

        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::Value::String(hint.clone()));
        }
        if !self.context.is_empty() {
            let context_map: serde_json::Map<String, serde_json::Value> = self
                .context
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            map.insert("context".to_string(), serde_json::Value::Object(context_map));
        }

        map
    }
}

/// Errors raised before any stage executes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The family is not one of the supported architectures.
    #[error("Invalid family specified: '{value}'")]
    InvalidFamily {
        /// The rejected value.
        value: String,
    },

    /// A label bound does not name a declared label.
    #[error("Unknown label '{label}'")]
    UnknownLabel {
        /// The rejected label.
        label: String,
    },

    /// The start label is declared after the end label.
    #[error("Label range is inverted: '{start}' comes after '{end}'")]
    InvertedRange {
        /// The requested start label.
        start: Label,
        /// The requested end label.
        end: Label,
    },

    /// A label bound is missing from the pipeline definition being run.
    #[error("Label '{label}' is not part of the pipeline definition")]
    LabelNotInPipeline {
        /// The missing label.
        label: Label,
    },

    /// The design handle has a partial selection.
    #[error("This command only operates on fully selected designs")]
    PartialSelection,

    /// A definition was built for a different mode than it is run in.
    #[error("Pipeline definition was built in {built} mode, cannot {requested} it")]
    ModeMismatch {
        /// The mode the definition was built in.
        built: RunMode,
        /// The mode that was requested.
        requested: RunMode,
    },

    /// An option that takes a value was given none.
    #[error("Option '{option}' requires an argument")]
    MissingValue {
        /// The option name.
        option: String,
    },

    /// An option was not recognized.
    #[error("Unknown option '{option}'")]
    UnknownOption {
        /// The option name.
        option: String,
    },

    /// An options file could not be read or parsed.
    #[error("Failed to load options from '{source_name}': {message}")]
    Load {
        /// Where the options came from.
        source_name: String,
        /// The underlying reason.
        message: String,
    },
}

impl ConfigurationError {
    /// Returns the structured diagnostic for this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        match self {
            Self::InvalidFamily { value } => {
                let supported: Vec<&str> = TargetFamily::ALL.iter().map(|f| f.as_str()).collect();
                ErrorInfo::new("CONFIG-001-FAMILY", self.to_string())
                    .with_fix_hint(format!("Use one of: {}", supported.join(", ")))
                    .with_context_entry("family", value.clone())
            }
            Self::UnknownLabel { label } => {
                let labels: Vec<&str> = Label::ALL.iter().map(|l| l.as_str()).collect();
                ErrorInfo::new("CONFIG-002-LABEL", self.to_string())
                    .with_fix_hint(format!("Declared labels: {}", labels.join(", ")))
                    .with_context_entry("label", label.clone())
            }
            Self::InvertedRange { start, end } => {
                ErrorInfo::new("CONFIG-003-RANGE", self.to_string())
                    .with_fix_hint("Swap the bounds; labels run in declaration order.")
                    .with_context_entry("start", start.as_str())
                    .with_context_entry("end", end.as_str())
            }
            Self::LabelNotInPipeline { label } => {
                ErrorInfo::new("CONFIG-004-PIPELINE", self.to_string())
                    .with_context_entry("label", label.as_str())
            }
            Self::PartialSelection => ErrorInfo::new("CONFIG-005-SELECTION", self.to_string())
                .with_fix_hint("Clear the selection (e.g. `select -clear`) before running."),
            Self::ModeMismatch { built, requested } => {
                ErrorInfo::new("CONFIG-008-MODE", self.to_string())
                    .with_fix_hint("Build the definition from a configuration in the requested mode.")
                    .with_context_entry("built", built.to_string())
                    .with_context_entry("requested", requested.to_string())
            }
            Self::MissingValue { option } | Self::UnknownOption { option } => {
                ErrorInfo::new("CONFIG-006-OPTION", self.to_string())
                    .with_fix_hint("Run with -help for the list of options.")
                    .with_context_entry("option", option.clone())
            }
            Self::Load { source_name, .. } => ErrorInfo::new("CONFIG-007-LOAD", self.to_string())
                .with_context_entry("source", source_name.clone()),
        }
    }
}

/// Failure while evaluating a single inclusion predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// The predicate asked about a feature that has no meaning for the family.
    #[error("feature '{feature}' does not apply to family '{family}'")]
    FeatureNotApplicable {
        /// The queried feature.
        feature: Feature,
        /// The configured family.
        family: TargetFamily,
    },
}

/// Errors raised while building a pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// An inclusion predicate could not be evaluated.
    #[error("Cannot plan '{operation}{}' in stage '{label}': {source}", display_arguments(.arguments))]
    Predicate {
        /// The stage label.
        label: Label,
        /// The operation name.
        operation: String,
        /// The argument string.
        arguments: String,
        /// The underlying failure.
        #[source]
        source: PredicateError,
    },

    /// A stage was declared out of label order or twice.
    #[error("Stage '{label}' declared after '{previous}'")]
    LabelOutOfOrder {
        /// The offending label.
        label: Label,
        /// The label declared before it.
        previous: Label,
    },

    /// A declared label has no stage.
    #[error("Stage '{label}' was never declared")]
    MissingLabel {
        /// The missing label.
        label: Label,
    },
}

impl PlanningError {
    /// Returns the structured diagnostic for this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        match self {
            Self::Predicate {
                label,
                operation,
                arguments,
                ..
            } => ErrorInfo::new("PLAN-001-PREDICATE", self.to_string())
                .with_fix_hint("Gate the step on its family before querying family-specific flags.")
                .with_context_entry("label", label.as_str())
                .with_context_entry("operation", operation.clone())
                .with_context_entry("arguments", arguments.clone()),
            Self::LabelOutOfOrder { label, previous } => {
                ErrorInfo::new("PLAN-002-ORDER", self.to_string())
                    .with_fix_hint("Declare stages once each, in label order.")
                    .with_context_entry("label", label.as_str())
                    .with_context_entry("previous", previous.as_str())
            }
            Self::MissingLabel { label } => ErrorInfo::new("PLAN-003-MISSING", self.to_string())
                .with_fix_hint("Declare every label, even if its stage is empty.")
                .with_context_entry("label", label.as_str()),
        }
    }
}

/// An included invocation failed in the external executor.
///
/// The design is left in whatever state the last successful invocation
/// produced.
#[derive(Debug, Error)]
#[error("Operation '{operation}{}' failed in stage '{label}': {source}", display_arguments(.arguments))]
pub struct OperationError {
    /// The stage label.
    pub label: Label,
    /// The operation name.
    pub operation: String,
    /// The argument string, verbatim.
    pub arguments: String,
    /// The executor's error.
    #[source]
    pub source: anyhow::Error,
}

impl OperationError {
    /// Creates a new operation error.
    #[must_use]
    pub fn new(
        label: Label,
        operation: impl Into<String>,
        arguments: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self {
            label,
            operation: operation.into(),
            arguments: arguments.into(),
            source,
        }
    }

    /// Returns the structured diagnostic for this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new("OP-001-FAILED", self.to_string())
            .with_fix_hint("Re-run with -describe to inspect the planned arguments.")
            .with_context_entry("label", self.label.as_str())
            .with_context_entry("operation", self.operation.clone())
            .with_context_entry("arguments", self.arguments.clone())
    }
}

fn display_arguments(arguments: &str) -> String {
    if arguments.is_empty() {
        String::new()
    } else {
        format!(" {arguments}")
    }
}
