//! Core domain model types for stepchain.
//!
//! This module contains the fundamental types used throughout the executor:
//! - The per-run state machine
//! - The execution trace and run outcome
//! - Lifecycle events

mod event;
mod state;
mod trace;

pub use event::StepEvent;
pub use state::{InvalidTransition, RunState};
pub use trace::{ExecutionTrace, RunOutcome, TraceEntry};
