//! Step trait and implementations.
//!
//! Steps are the units of work in a stepchain pipeline. Each step receives
//! the resolved output of the previous step and returns a pending result.

mod typed;

pub use typed::TypedFnStep;

use crate::errors::StepError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;

/// Result of a single step.
pub type StepResult = Result<Value, StepError>;

/// Trait for pipeline steps.
///
/// A step consumes one input value and resolves to one output value, or
/// fails. The first step of a pipeline receives the run's initial input,
/// which is [`Value::Null`] when the run was started without one.
#[async_trait]
pub trait Step: Send + Sync + Debug {
    /// Returns the name of the step.
    fn name(&self) -> &str;

    /// Executes the step.
    ///
    /// # Arguments
    ///
    /// * `input` - The output of the previous step
    async fn execute(&self, input: Value) -> StepResult;
}

/// A step backed by a synchronous function.
pub struct FnStep<F>
where
    F: Fn(Value) -> StepResult + Send + Sync,
{
    name: String,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(Value) -> StepResult + Send + Sync,
{
    /// Creates a new function-based step.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Debug for FnStep<F>
where
    F: Fn(Value) -> StepResult + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F> Step for FnStep<F>
where
    F: Fn(Value) -> StepResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: Value) -> StepResult {
        (self.func)(input)
    }
}

/// A step backed by an async function.
pub struct AsyncFnStep<F, Fut>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = StepResult> + Send,
{
    name: String,
    func: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncFnStep<F, Fut>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = StepResult> + Send,
{
    /// Creates a new async function-based step.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, Fut> Debug for AsyncFnStep<F, Fut>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = StepResult> + Send,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncFnStep").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut> Step for AsyncFnStep<F, Fut>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = StepResult> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: Value) -> StepResult {
        (self.func)(input).await
    }
}

/// A step that passes its input through unchanged.
#[derive(Debug, Clone)]
pub struct IdentityStep {
    name: String,
}

impl IdentityStep {
    /// Creates a new identity step.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Step for IdentityStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: Value) -> StepResult {
        Ok(input)
    }
}
