//! Pipeline declaration and planning.
//!
//! This module provides:
//! - Gated invocation declarations and their resolution
//! - Stage declarations with nested gate scopes
//! - The validating pipeline builder
//! - The QuickLogic script and the resolved pipeline definition
//! - The textual plan report

mod builder;
mod definition;
mod invocation;
mod report;
mod script;
mod stage;

pub use builder::PipelineBuilder;
pub use definition::PipelineDefinition;
pub use invocation::{Gate, Inclusion, Invocation, InvocationSpec, Predicate};
pub use report::PlanReport;
pub use script::{build_pipeline, plan, quicklogic_script};
pub use stage::{Stage, StageScope, StageSpec};
