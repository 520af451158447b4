//! Testing utilities for stepchain pipelines.
//!
//! This module provides:
//! - Mock steps that record their invocations
//! - Assertions over traces and failures

mod assertions;
mod mocks;

pub use assertions::{assert_failed_at, assert_trace_outputs};
pub use mocks::{InvocationLog, RecordingStep, SlowStep};
