//! Steps over concrete input and output types.

use super::{Step, StepResult};
use crate::errors::StepError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;

/// A step whose operation works on typed values.
///
/// The incoming [`Value`] is deserialized into `I` before the operation runs
/// and the resolved `O` is serialized back. A zero-argument first step uses
/// `I = ()`, which accepts the `null` initial input.
pub struct TypedFnStep<I, O, F, Fut>
where
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, StepError>> + Send,
{
    name: String,
    func: F,
    _phantom: PhantomData<fn(I) -> Fut>,
}

impl<I, O, F, Fut> TypedFnStep<I, O, F, Fut>
where
    I: DeserializeOwned + Send,
    O: Serialize + Send,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, StepError>> + Send,
{
    /// Creates a new typed step.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, F, Fut> Debug for TypedFnStep<I, O, F, Fut>
where
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, StepError>> + Send,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedFnStep")
            .field("name", &self.name)
            .field("input", &std::any::type_name::<I>())
            .finish()
    }
}

#[async_trait]
impl<I, O, F, Fut> Step for TypedFnStep<I, O, F, Fut>
where
    I: DeserializeOwned + Send,
    O: Serialize + Send,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, StepError>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: Value) -> StepResult {
        let typed: I = serde_json::from_value(input.clone())
            .map_err(|_| StepError::invalid_input(std::any::type_name::<I>(), &input))?;
        let output = (self.func)(typed).await?;
        serde_json::to_value(output).map_err(|e| StepError::rejected(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_typed_step_round_trips_values() {
        let step = TypedFnStep::new("len", |s: String| async move { Ok(s.len()) });
        assert_eq!(step.execute(json!("pinto")).await, Ok(json!(5)));
    }

    #[tokio::test]
    async fn test_typed_step_accepts_null_for_unit() {
        let step = TypedFnStep::new("source", |(): ()| async move { Ok("pinto") });
        assert_eq!(step.execute(Value::Null).await, Ok(json!("pinto")));
    }

    #[tokio::test]
    async fn test_typed_step_wrong_input() {
        let step = TypedFnStep::new("cook", |soft: bool| async move { Ok(soft) });
        let err = step.execute(json!("pinto")).await.unwrap_err();

        assert_eq!(
            err,
            StepError::InvalidInput {
                expected: "bool".to_string(),
                actual: "\"pinto\"".to_string(),
            }
        );
    }
}
