//! Error types for the stepchain executor.
//!
//! Construction problems surface as [`PipelineValidationError`], run-time
//! problems as [`StepFailure`], and the per-step cause as [`StepError`].

use crate::core::ExecutionTrace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for stepchain operations.
#[derive(Debug, Error)]
pub enum StepchainError {
    /// The pipeline could not be constructed.
    #[error("{0}")]
    InvalidPipeline(#[from] PipelineValidationError),

    /// A step failed while the pipeline was running.
    #[error("{0}")]
    StepFailure(#[from] StepFailure),

    /// Executor configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Why a single step did not produce an output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum StepError {
    /// The step's operation rejected with a reason.
    #[error("{0}")]
    Rejected(String),

    /// The step received an input of the wrong shape.
    #[error("expected {expected} input, got {actual}")]
    InvalidInput {
        /// Description of the accepted input.
        expected: String,
        /// The value actually received.
        actual: String,
    },

    /// The step did not resolve within the configured timeout.
    #[error("step timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that expired, in milliseconds.
        timeout_ms: u64,
    },

    /// The step panicked while running.
    #[error("step panicked: {0}")]
    Panicked(String),
}

impl StepError {
    /// Creates a rejection with the given reason.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Creates an invalid-input error describing the received value.
    #[must_use]
    pub fn invalid_input(expected: impl Into<String>, actual: &serde_json::Value) -> Self {
        Self::InvalidInput {
            expected: expected.into(),
            actual: actual.to_string(),
        }
    }

    /// Returns the machine-friendly kind of the error.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Timeout { .. } => "timeout",
            Self::Panicked(_) => "panicked",
        }
    }
}

impl From<String> for StepError {
    fn from(reason: String) -> Self {
        Self::Rejected(reason)
    }
}

impl From<&str> for StepError {
    fn from(reason: &str) -> Self {
        Self::Rejected(reason.to_string())
    }
}

/// A step failed; the run stopped at `step_index`.
///
/// The trace holds the outputs of every step that completed before the
/// failure, in order.
#[derive(Debug, Clone, Error)]
#[error("Step {step_index} ('{step_name}') failed: {cause}")]
pub struct StepFailure {
    /// Index of the failing step.
    pub step_index: usize,
    /// Name of the failing step.
    pub step_name: String,
    /// The underlying cause.
    #[source]
    pub cause: StepError,
    /// Outputs of the steps that completed before the failure.
    pub trace: ExecutionTrace,
}

impl StepFailure {
    /// Creates a new step failure.
    #[must_use]
    pub fn new(
        step_index: usize,
        step_name: impl Into<String>,
        cause: StepError,
        trace: ExecutionTrace,
    ) -> Self {
        Self {
            step_index,
            step_name: step_name.into(),
            cause,
            trace,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("step_index".to_string(), serde_json::json!(self.step_index));
        map.insert("step_name".to_string(), serde_json::json!(self.step_name));
        map.insert("cause".to_string(), serde_json::json!(self.cause.to_string()));
        map.insert("cause_kind".to_string(), serde_json::json!(self.cause.kind()));
        map.insert("completed_steps".to_string(), serde_json::json!(self.trace.len()));
        map
    }
}

/// Metadata about a contract error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "PIPELINE-EMPTY").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }
}

/// Error raised when a pipeline cannot be constructed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// Indices of the steps involved in the error.
    pub steps: Vec<usize>,
    /// Optional contract error info.
    pub error_info: Option<ContractErrorInfo>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            steps: Vec::new(),
            error_info: None,
        }
    }

    /// Error for a pipeline without steps.
    #[must_use]
    pub fn empty() -> Self {
        Self::new("Pipeline has no steps").with_error_info(
            ContractErrorInfo::new("PIPELINE-EMPTY", "Cannot build an empty pipeline")
                .with_fix_hint("Add at least one step to the pipeline before building."),
        )
    }

    /// Sets the steps involved.
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<usize>) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the contract error info.
    #[must_use]
    pub fn with_error_info(mut self, info: ContractErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }

    /// Returns the contract error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_info.as_ref().map(|info| info.code.as_str())
    }
}

/// Errors raised while loading executor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config document is not valid.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pipeline_error() {
        let err = PipelineValidationError::empty();
        assert_eq!(err.code(), Some("PIPELINE-EMPTY"));
        assert_eq!(err.to_string(), "Pipeline has no steps");
        assert!(err.error_info.unwrap().fix_hint.is_some());
    }

    #[test]
    fn test_step_failure_display() {
        let failure = StepFailure::new(
            1,
            "soak",
            StepError::rejected("beans too old"),
            ExecutionTrace::default(),
        );
        assert_eq!(failure.to_string(), "Step 1 ('soak') failed: beans too old");
    }

    #[test]
    fn test_step_failure_to_dict() {
        let failure = StepFailure::new(
            2,
            "cook",
            StepError::Timeout { timeout_ms: 50 },
            ExecutionTrace::default(),
        );
        let dict = failure.to_dict();

        assert_eq!(dict["step_index"], 2);
        assert_eq!(dict["cause_kind"], "timeout");
        assert_eq!(dict["completed_steps"], 0);
    }

    #[test]
    fn test_step_error_conversions() {
        let from_str: StepError = "nope".into();
        assert_eq!(from_str, StepError::Rejected("nope".to_string()));

        let invalid = StepError::invalid_input("boolean", &serde_json::json!("x"));
        assert_eq!(invalid.to_string(), "expected boolean input, got \"x\"");
        assert_eq!(invalid.kind(), "invalid_input");
    }

    #[test]
    fn test_step_error_serialize() {
        let json = serde_json::to_value(StepError::Timeout { timeout_ms: 10 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "timeout", "detail": {"timeout_ms": 10}})
        );

        let json = serde_json::to_value(StepError::rejected("beans too old")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "rejected", "detail": "beans too old"})
        );
    }

    #[test]
    fn test_umbrella_from() {
        let err: StepchainError = PipelineValidationError::empty().into();
        assert!(matches!(err, StepchainError::InvalidPipeline(_)));
    }
}
