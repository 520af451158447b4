//! Pipeline builder with validation.

use super::{ExecutorConfig, Pipeline, StepSpec};
use crate::errors::{ContractErrorInfo, PipelineValidationError, StepError};
use crate::events::EventSink;
use crate::steps::{AsyncFnStep, FnStep, Step, StepResult, TypedFnStep};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Builder for creating validated pipelines.
///
/// Steps run in the order they are added. The `then*` methods read like a
/// promise chain:
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new("beans")
///     .then("shop", |_| async { Ok(json!("pinto")) })
///     .then("soak", |kind| async move { Ok(json!(kind.is_string())) })
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: String,
    steps: Vec<Arc<dyn Step>>,
    config: ExecutorConfig,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            config: ExecutorConfig::default(),
            event_sink: None,
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, step: Arc<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends every step from an iterator, in order.
    #[must_use]
    pub fn steps(mut self, steps: impl IntoIterator<Item = Arc<dyn Step>>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Appends an async step that consumes the previous output.
    #[must_use]
    pub fn then<F, Fut>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.step(Arc::new(AsyncFnStep::new(name, func)))
    }

    /// Appends a synchronous step that consumes the previous output.
    #[must_use]
    pub fn then_sync<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> StepResult + Send + Sync + 'static,
    {
        self.step(Arc::new(FnStep::new(name, func)))
    }

    /// Appends an async step over typed input and output.
    #[must_use]
    pub fn then_typed<I, O, F, Fut>(self, name: impl Into<String>, func: F) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, StepError>> + Send + 'static,
    {
        self.step(Arc::new(TypedFnStep::new(name, func)))
    }

    /// Sets the executor configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the sink that receives lifecycle events.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of steps added so far.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline has no steps or a name is blank.
    pub fn build(self) -> Result<Pipeline, PipelineValidationError> {
        if self.name.trim().is_empty() {
            return Err(
                PipelineValidationError::new("Pipeline name cannot be empty or whitespace-only")
                    .with_error_info(ContractErrorInfo::new(
                        "PIPELINE-NAME",
                        "Pipeline names cannot be blank",
                    )),
            );
        }

        if self.steps.is_empty() {
            return Err(PipelineValidationError::empty());
        }

        let specs = self
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| {
                let spec = StepSpec::new(index, step);
                spec.validate().map(|()| spec)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Pipeline::new(self.name, specs, self.config, self.event_sink))
    }
}
