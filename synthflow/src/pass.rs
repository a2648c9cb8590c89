//! The `synth_quicklogic` command.
//!
//! [`SynthPass`] ties the layers together: options are parsed and resolved,
//! the design is checked, the plan is built fresh and handed to a
//! [`Runner`].

use crate::config::{help_text, parse_args, SynthConfig, SynthOptions};
use crate::core::{LabelRange, RunMode, TargetFamily};
use crate::dispatch::{DesignGraph, OperationExecutor};
use crate::errors::{ConfigurationError, SynthflowError};
use crate::events::EventSink;
use crate::pipeline::build_pipeline;
use crate::runner::{RunSummary, Runner};
use std::sync::Arc;
use tracing::{info, warn};

/// Scratchpad key holding the ABC9 delay target in picoseconds.
pub const ABC9_DELAY_KEY: &str = "abc9.D";

/// Half the period of a 12 MHz clock, in picoseconds.
pub const DEFAULT_ABC9_DELAY: i64 = 41_667;

/// Synthesis for QuickLogic FPGAs.
#[derive(Debug)]
pub struct SynthPass {
    runner: Runner,
}

impl SynthPass {
    /// Creates the pass over `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn OperationExecutor>) -> Self {
        Self {
            runner: Runner::new(executor),
        }
    }

    /// Sets the event sink of the underlying runner.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.runner = self.runner.with_event_sink(sink);
        self
    }

    /// Runs the command with a Yosys-style option vector.
    ///
    /// # Errors
    ///
    /// See [`Self::run_options`]. A malformed vector is a configuration
    /// error.
    pub async fn execute<S: AsRef<str>>(
        &mut self,
        args: &[S],
        design: &mut dyn DesignGraph,
    ) -> Result<RunSummary, SynthflowError> {
        let options = parse_args(args)?;
        self.run_options(&options, design).await
    }

    /// Runs the command with already-parsed options.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown family or label, an
    /// inverted range, or a partially selected design; a planning error if
    /// the script cannot be resolved; an operation error for the first
    /// failing invocation.
    pub async fn run_options(
        &mut self,
        options: &SynthOptions,
        design: &mut dyn DesignGraph,
    ) -> Result<RunSummary, SynthflowError> {
        let range = LabelRange::parse(options.run_from.as_deref(), options.run_to.as_deref())?;
        let config = SynthConfig::resolve(options)?;

        if config.mode() == RunMode::Execute {
            if !design.is_fully_selected() {
                return Err(ConfigurationError::PartialSelection.into());
            }
            apply_abc9_delay_default(&config, design);
        }

        let definition = build_pipeline(&config)?;
        info!(family = %config.family(), mode = %config.mode(), range = %range, "Executing SYNTH_QUICKLOGIC pass");
        self.runner.run(definition, design, range).await
    }

    /// Renders the plan for `options` without a design.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown family or label, or a
    /// planning error if the script cannot be resolved.
    pub fn describe(&mut self, options: &SynthOptions) -> Result<RunSummary, SynthflowError> {
        let range = LabelRange::parse(options.run_from.as_deref(), options.run_to.as_deref())?;
        let config = SynthConfig::resolve(options)?.with_mode(RunMode::Describe);
        let definition = build_pipeline(&config)?;
        self.runner.describe(definition, range)
    }

    /// Returns the option reference followed by the default plan.
    ///
    /// # Errors
    ///
    /// Returns a planning error if the default script cannot be resolved.
    pub fn help() -> Result<String, SynthflowError> {
        let config = SynthConfig::new(TargetFamily::default()).with_mode(RunMode::Describe);
        let definition = build_pipeline(&config)?;

        let mut out = help_text();
        out.push_str("\nThe following commands are executed by this synthesis command:\n\n");
        out.push_str(definition.report(LabelRange::full()).as_str());
        Ok(out)
    }
}

/// Sets the ABC9 delay target when ABC9 will run and none was given.
fn apply_abc9_delay_default(config: &SynthConfig, design: &mut dyn DesignGraph) {
    if !config.features().abc9 {
        return;
    }
    if design.scratchpad_int(ABC9_DELAY_KEY).unwrap_or(0) == 0 {
        warn!("delay target has not been set via SDC or scratchpad; assuming 12 MHz clock");
        design.set_scratchpad_int(ABC9_DELAY_KEY, DEFAULT_ABC9_DELAY);
    }
}
