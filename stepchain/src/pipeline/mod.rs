//! Pipeline building and execution.
//!
//! This module provides:
//! - Step specifications
//! - Pipeline builder with validation
//! - The sequential executor
//! - Executor configuration

mod builder;
mod config;
mod executor;
mod spec;

pub use builder::PipelineBuilder;
pub use config::ExecutorConfig;
pub use executor::Pipeline;
pub use spec::StepSpec;
