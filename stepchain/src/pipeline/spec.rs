//! Step specifications.

use crate::errors::{ContractErrorInfo, PipelineValidationError};
use crate::steps::Step;
use std::sync::Arc;

/// A step at a fixed position in a pipeline.
#[derive(Debug, Clone)]
pub struct StepSpec {
    /// Position of the step, 0-based.
    pub index: usize,
    /// The step name.
    pub name: String,
    /// The step implementation.
    pub operation: Arc<dyn Step>,
}

impl StepSpec {
    /// Creates a new step specification.
    #[must_use]
    pub fn new(index: usize, operation: Arc<dyn Step>) -> Self {
        Self {
            index,
            name: operation.name().to_string(),
            operation,
        }
    }

    /// Validates the step specification.
    ///
    /// # Errors
    ///
    /// Returns an error if the step name is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), PipelineValidationError> {
        if self.name.trim().is_empty() {
            return Err(PipelineValidationError::new(format!(
                "Step {} has an empty name",
                self.index
            ))
            .with_steps(vec![self.index])
            .with_error_info(
                ContractErrorInfo::new("PIPELINE-NAME", "Step names cannot be blank")
                    .with_fix_hint("Give every step a descriptive, non-empty name."),
            ));
        }
        Ok(())
    }
}
