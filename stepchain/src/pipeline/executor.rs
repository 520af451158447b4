//! Sequential pipeline executor.
//!
//! Runs steps one at a time, feeding each step the resolved output of the
//! previous one, and stops at the first failure.

use super::{ExecutorConfig, StepSpec};
use crate::core::{ExecutionTrace, InvalidTransition, RunOutcome, RunState, StepEvent, TraceEntry};
use crate::errors::{StepError, StepFailure};
use crate::events::{EventSink, NoOpEventSink};
use crate::steps::StepResult;
use crate::utils::{generate_run_id, SpanTimer};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

/// An immutable, validated sequence of steps.
///
/// Cloning is cheap and clones share the same steps. Independent runs may
/// execute concurrently; each run owns its own trace.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: Arc<str>,
    steps: Arc<[StepSpec]>,
    config: Arc<ExecutorConfig>,
    event_sink: Arc<dyn EventSink>,
}

impl Pipeline {
    pub(crate) fn new(
        name: String,
        steps: Vec<StepSpec>,
        config: ExecutorConfig,
        event_sink: Option<Arc<dyn EventSink>>,
    ) -> Self {
        Self {
            name: name.into(),
            steps: steps.into(),
            config: Arc::new(config),
            event_sink: event_sink.unwrap_or_else(|| Arc::new(NoOpEventSink)),
        }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns the executor configuration.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs the pipeline and returns the final step's output.
    ///
    /// `input` is handed to the first step; `None` becomes [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns a [`StepFailure`] tagged with the index of the first step
    /// that failed. Later steps are never invoked.
    pub async fn run(&self, input: Option<Value>) -> Result<Value, StepFailure> {
        self.run_traced(input).await.map(|outcome| outcome.output)
    }

    /// Runs the pipeline and returns the final output with the full trace.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run`].
    pub async fn run_traced(&self, input: Option<Value>) -> Result<RunOutcome, StepFailure> {
        let run_id = generate_run_id();
        let span = tracing::info_span!("pipeline", pipeline = %self.name, run_id = %run_id);
        self.drive(run_id, input.unwrap_or(Value::Null))
            .instrument(span)
            .await
    }

    /// Runs the pipeline on a background task and hands the result to
    /// `callback` once the run finishes.
    ///
    /// The callback is invoked exactly once. Must be called from within a
    /// tokio runtime.
    pub fn run_with_callback<C>(&self, input: Option<Value>, callback: C) -> JoinHandle<()>
    where
        C: FnOnce(Result<RunOutcome, StepFailure>) + Send + 'static,
    {
        let pipeline = self.clone();
        tokio::spawn(async move {
            let result = pipeline.run_traced(input).await;
            callback(result);
        })
    }

    async fn drive(&self, run_id: Uuid, input: Value) -> Result<RunOutcome, StepFailure> {
        let timer = SpanTimer::start();
        let step_count = self.steps.len();
        let mut trace = ExecutionTrace::with_capacity(step_count);
        let mut state = advance(RunState::NotStarted, RunState::NotStarted.start());
        let mut current = input;

        tracing::debug!(steps = step_count, "Pipeline started");
        self.emit(StepEvent::pipeline_started(&self.name, run_id, step_count))
            .await;

        for spec in self.steps.iter() {
            self.emit(StepEvent::step_started(&self.name, run_id, spec.index, &spec.name))
                .await;

            let step_timer = SpanTimer::start();
            let result = self.execute_step(spec, current).await;
            let duration_ms = step_timer.elapsed_ms();

            match result {
                Ok(output) => {
                    tracing::info!(
                        step = %spec.name,
                        index = spec.index,
                        duration_ms,
                        output = %output,
                        "Step resolved"
                    );
                    self.emit(StepEvent::step_completed(
                        &self.name,
                        run_id,
                        spec.index,
                        &spec.name,
                        &output,
                        duration_ms,
                    ))
                    .await;

                    trace.record(TraceEntry {
                        index: spec.index,
                        name: spec.name.clone(),
                        output: output.clone(),
                        duration_ms,
                    });
                    state = advance(state, state.resolve(step_count));
                    current = output;
                }
                Err(cause) => {
                    state = advance(state, state.fail());
                    tracing::warn!(
                        step = %spec.name,
                        index = spec.index,
                        error = %cause,
                        %state,
                        "Step failed, stopping pipeline"
                    );
                    let message = cause.to_string();
                    self.emit(StepEvent::step_failed(
                        &self.name,
                        run_id,
                        spec.index,
                        &spec.name,
                        &message,
                    ))
                    .await;
                    self.emit(StepEvent::pipeline_failed(&self.name, run_id, spec.index, &message))
                        .await;

                    return Err(StepFailure::new(spec.index, spec.name.clone(), cause, trace));
                }
            }
        }

        let duration_ms = timer.elapsed_ms();
        tracing::debug!(%state, duration_ms, "Pipeline completed");
        self.emit(StepEvent::pipeline_completed(&self.name, run_id, duration_ms))
            .await;

        Ok(RunOutcome {
            run_id,
            output: current,
            trace,
            duration_ms,
        })
    }

    async fn execute_step(&self, spec: &StepSpec, input: Value) -> StepResult {
        let pending = AssertUnwindSafe(spec.operation.execute(input)).catch_unwind();

        let settled = match self.config.step_timeout() {
            Some(limit) => match tokio::time::timeout(limit, pending).await {
                Ok(settled) => settled,
                Err(_) => {
                    let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                    return Err(StepError::Timeout { timeout_ms });
                }
            },
            None => pending.await,
        };

        settled.unwrap_or_else(|payload| Err(StepError::Panicked(panic_message(&*payload))))
    }

    async fn emit(&self, event: StepEvent) {
        if self.config.emit_events {
            self.event_sink.emit_event(&event).await;
        }
    }
}

/// Applies a state transition the executor guarantees to be valid.
fn advance(current: RunState, next: Result<RunState, InvalidTransition>) -> RunState {
    next.unwrap_or_else(|err| {
        tracing::error!(error = %err, "Run state machine violated");
        if cfg!(debug_assertions) {
            unreachable!("{err}");
        }
        current
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::pipeline::PipelineBuilder;
    use crate::testing::{assert_trace_outputs, RecordingStep};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_feeds_outputs_forward() {
        let pipeline = PipelineBuilder::new("math")
            .then_sync("start", |_| Ok(json!(1)))
            .then_sync("add", |v| Ok(json!(v.as_i64().unwrap_or(0) + 2)))
            .then_sync("mul", |v| Ok(json!(v.as_i64().unwrap_or(0) * 10)))
            .build()
            .unwrap();

        let outcome = pipeline.run_traced(None).await.unwrap();
        assert_eq!(outcome.output, json!(30));
        assert_trace_outputs(&outcome.trace, &[json!(1), json!(3), json!(30)]);
    }

    #[tokio::test]
    async fn test_initial_input_reaches_first_step() {
        let pipeline = PipelineBuilder::new("echo")
            .then_sync("echo", Ok)
            .build()
            .unwrap();

        assert_eq!(pipeline.run(Some(json!("seed"))).await.unwrap(), json!("seed"));
        assert_eq!(pipeline.run(None).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_failure_short_circuits() {
        let log = RecordingStep::shared_log();
        let pipeline = PipelineBuilder::new("short")
            .step(Arc::new(RecordingStep::new("a", json!("a"), log.clone())))
            .step(Arc::new(RecordingStep::failing("b", "boom", log.clone())))
            .step(Arc::new(RecordingStep::new("c", json!("c"), log.clone())))
            .build()
            .unwrap();

        let failure = pipeline.run(None).await.unwrap_err();

        assert_eq!(failure.step_index, 1);
        assert_eq!(failure.step_name, "b");
        assert_eq!(failure.cause, StepError::rejected("boom"));
        assert_eq!(failure.trace.outputs(), vec![json!("a")]);
        assert_eq!(*log.lock(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_step_timeout_fails_run() {
        let pipeline = PipelineBuilder::new("slow")
            .then_sync("fast", |_| Ok(json!(1)))
            .then("stuck", |_| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(json!(2))
            })
            .with_config(ExecutorConfig::new().with_step_timeout_ms(20))
            .build()
            .unwrap();

        let failure = pipeline.run(None).await.unwrap_err();
        assert_eq!(failure.step_index, 1);
        assert_eq!(failure.cause, StepError::Timeout { timeout_ms: 20 });
        assert_eq!(failure.trace.len(), 1);
    }

    #[tokio::test]
    async fn test_panicking_step_becomes_failure() {
        let pipeline = PipelineBuilder::new("panics")
            .then_sync("explode", |_| panic!("kaboom"))
            .build()
            .unwrap();

        let failure = pipeline.run(None).await.unwrap_err();
        assert_eq!(failure.step_index, 0);
        assert_eq!(failure.cause, StepError::Panicked("kaboom".to_string()));
        assert!(failure.trace.is_empty());
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let sink = Arc::new(CollectingEventSink::new());
        let pipeline = PipelineBuilder::new("events")
            .then_sync("one", |_| Ok(json!(1)))
            .then_sync("two", |_| Err(StepError::rejected("nope")))
            .with_event_sink(sink.clone())
            .build()
            .unwrap();

        let _ = pipeline.run(None).await;

        assert_eq!(
            sink.event_types(),
            vec![
                "pipeline.started",
                "step.started",
                "step.completed",
                "step.started",
                "step.failed",
                "pipeline.failed",
            ]
        );
        let failed = &sink.events_of_type("step.failed")[0];
        let data = failed.1.as_ref().unwrap();
        assert_eq!(data["index"], 1);
        assert_eq!(data["error"], "nope");
    }

    #[tokio::test]
    async fn test_events_disabled() {
        let sink = Arc::new(CollectingEventSink::new());
        let pipeline = PipelineBuilder::new("quiet")
            .then_sync("one", |_| Ok(json!(1)))
            .with_event_sink(sink.clone())
            .with_config(ExecutorConfig::new().with_events(false))
            .build()
            .unwrap();

        pipeline.run(None).await.unwrap();
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_run_ids_differ_per_run() {
        let pipeline = PipelineBuilder::new("ids")
            .then_sync("one", |_| Ok(json!(1)))
            .build()
            .unwrap();

        let a = pipeline.run_traced(None).await.unwrap();
        let b = pipeline.run_traced(None).await.unwrap();
        assert_ne!(a.run_id, b.run_id);
    }

    #[tokio::test]
    async fn test_callback_receives_result() {
        let pipeline = PipelineBuilder::new("callback")
            .then_sync("one", |_| Ok(json!("done")))
            .build()
            .unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel();
        pipeline
            .run_with_callback(None, move |result| {
                let _ = tx.send(result);
            })
            .await
            .unwrap();

        let outcome = rx.await.unwrap().unwrap();
        assert_eq!(outcome.output, json!("done"));
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&"owned".to_string()), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }

    #[test]
    fn test_advance_applies_valid_transition() {
        let next = advance(RunState::NotStarted, RunState::NotStarted.start());
        assert_eq!(next, RunState::Running(0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_advance_rejects_invalid_transition_in_debug() {
        let _ = advance(RunState::Completed, RunState::Completed.start());
    }
}
