//! Testing utilities for synthflow pipelines.
//!
//! This module provides:
//! - A recording executor and an in-memory design
//! - Assertions over run summaries and plan reports

mod assertions;
mod mocks;

pub use assertions::{
    assert_dispatched, assert_nothing_dispatched, assert_skipped_with, assert_stage_lines,
};
pub use mocks::{InMemoryDesign, RecordingExecutor};
