//! # Stepchain
//!
//! A sequential executor for chains of dependent asynchronous steps.
//!
//! Each step receives the resolved output of the step before it, steps never
//! overlap, and the first failure stops the run:
//!
//! - **Ordered execution**: step *i + 1* starts only after step *i* resolves
//! - **Short-circuit**: a failure is reported with the failing step's index
//! - **Execution traces**: every run records the outputs it produced
//! - **Two surfaces**: `await` the run, or hand it a completion callback
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepchain::prelude::*;
//!
//! let pipeline = PipelineBuilder::new("make-beans")
//!     .then_typed("shop", |(): ()| async { Ok::<_, StepError>("pinto") })
//!     .then_typed("soak", |kind: String| async move { Ok::<_, StepError>(!kind.is_empty()) })
//!     .then_typed("cook", |soft: bool| async move {
//!         if soft { Ok("Dinner is ready!") } else { Err(StepError::rejected("still hard")) }
//!     })
//!     .build()?;
//!
//! let dinner = pipeline.run(None).await?;
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

pub mod core;
pub mod errors;
pub mod events;
#[cfg(feature = "demo")]
pub mod kitchen;
pub mod pipeline;
pub mod steps;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{ExecutionTrace, RunOutcome, RunState, StepEvent, TraceEntry};
    pub use crate::errors::{
        ConfigError, ContractErrorInfo, PipelineValidationError, StepError, StepFailure,
        StepchainError,
    };
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{ExecutorConfig, Pipeline, PipelineBuilder, StepSpec};
    pub use crate::steps::{AsyncFnStep, FnStep, IdentityStep, Step, StepResult, TypedFnStep};
}
