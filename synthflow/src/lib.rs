//! # Synthflow
//!
//! A staged, resumable synthesis-script orchestrator for QuickLogic FPGAs.
//!
//! Synthflow plans a fixed but parameterized sequence of design
//! transformations and drives it through an external executor:
//!
//! - **Labelled checkpoints**: the script is split into named stages, and any
//!   contiguous range of them can be run on its own
//! - **Gated invocations**: each step is included, skipped or omitted per
//!   target family and feature flag, decided once while the plan is built
//! - **Describe mode**: the same plan is rendered as text, skipped steps
//!   annotated with their condition, without touching a design
//! - **Event-driven observability**: runs report progress to an event sink
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use synthflow::prelude::*;
//!
//! let mut pass = SynthPass::new(Arc::new(MyYosysBridge::new()));
//! let summary = pass
//!     .execute(&["-family", "qlf_k6n10", "-run", "begin:map_luts"], &mut design)
//!     .await?;
//! println!("{} invocations dispatched", summary.dispatched_count());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod pass;
pub mod pipeline;
pub mod runner;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        parse_args, Feature, FeatureFlags, OutputFiles, OutputKind, SynthConfig, SynthOptions,
    };
    pub use crate::core::{
        InvocationStatus, Label, LabelRange, RunMode, RunState, TargetFamily,
    };
    pub use crate::dispatch::{DesignGraph, OperationExecutor};
    pub use crate::errors::{
        ConfigurationError, ErrorInfo, OperationError, PlanningError, SynthflowError,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink, RunEvent};
    pub use crate::pass::SynthPass;
    pub use crate::pipeline::{
        build_pipeline, Gate, Invocation, PipelineBuilder, PipelineDefinition, PlanReport,
        Stage,
    };
    pub use crate::runner::{InvocationRecord, RunSummary, Runner};
}
