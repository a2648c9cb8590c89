//! Core vocabulary types.
//!
//! This module provides:
//! - Target families and their argument table
//! - Checkpoint labels and label ranges
//! - Run mode and status enums

mod family;
mod label;
mod status;

pub use family::{FamilyRules, TargetFamily};
pub use label::{Label, LabelRange};
pub use status::{InvocationStatus, RunMode, RunState};
