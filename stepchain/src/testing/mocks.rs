//! Mock steps for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::StepError;
use crate::steps::{Step, StepResult};

/// Names of invoked steps, shared between mocks in invocation order.
pub type InvocationLog = Arc<Mutex<Vec<String>>>;

/// A step that records each call and returns a fixed result.
#[derive(Debug)]
pub struct RecordingStep {
    name: String,
    result: StepResult,
    log: InvocationLog,
    inputs: Mutex<Vec<Value>>,
}

impl RecordingStep {
    /// Creates a new empty invocation log.
    #[must_use]
    pub fn shared_log() -> InvocationLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Creates a step that resolves to `output`.
    #[must_use]
    pub fn new(name: impl Into<String>, output: Value, log: InvocationLog) -> Self {
        Self {
            name: name.into(),
            result: Ok(output),
            log,
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Creates a step that rejects with `reason`.
    #[must_use]
    pub fn failing(name: impl Into<String>, reason: impl Into<String>, log: InvocationLog) -> Self {
        Self {
            name: name.into(),
            result: Err(StepError::rejected(reason)),
            log,
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of times the step was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inputs.lock().len()
    }

    /// Returns the inputs received, one per call.
    #[must_use]
    pub fn inputs(&self) -> Vec<Value> {
        self.inputs.lock().clone()
    }
}

#[async_trait]
impl Step for RecordingStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: Value) -> StepResult {
        self.log.lock().push(self.name.clone());
        self.inputs.lock().push(input);
        self.result.clone()
    }
}

/// A step that suspends before echoing its input with a suffix.
#[derive(Debug)]
pub struct SlowStep {
    name: String,
    delay: Duration,
}

impl SlowStep {
    /// Creates a slow step with delay in milliseconds.
    #[must_use]
    pub fn with_delay_ms(name: impl Into<String>, ms: u64) -> Self {
        Self {
            name: name.into(),
            delay: Duration::from_millis(ms),
        }
    }
}

#[async_trait]
impl Step for SlowStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, input: Value) -> StepResult {
        tokio::time::sleep(self.delay).await;
        let prefix = input.as_str().unwrap_or_default();
        Ok(Value::String(format!("{prefix}/{}", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_recording_step() {
        let log = RecordingStep::shared_log();
        let step = RecordingStep::new("a", json!(1), log.clone());

        assert_eq!(step.execute(json!("in")).await, Ok(json!(1)));
        assert_eq!(step.call_count(), 1);
        assert_eq!(step.inputs(), vec![json!("in")]);
        assert_eq!(*log.lock(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_slow_step_appends_name() {
        let step = SlowStep::with_delay_ms("b", 1);
        assert_eq!(step.execute(json!("a")).await, Ok(json!("a/b")));
    }
}
