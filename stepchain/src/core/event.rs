//! Lifecycle events emitted while a pipeline runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// An event describing a pipeline or step transition.
///
/// Events are handed to an [`EventSink`](crate::events::EventSink) for
/// logging, monitoring, or test assertions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepEvent {
    /// The event type (e.g., "step.started", "pipeline.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event occurred (ISO 8601).
    pub timestamp: String,

    /// The event payload data.
    #[serde(default)]
    pub data: HashMap<String, Value>,
}

impl StepEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: crate::utils::iso_timestamp(),
            data: HashMap::new(),
        }
    }

    /// Adds a data field to the event.
    #[must_use]
    pub fn add_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Returns the payload handed to event sinks.
    #[must_use]
    pub fn payload(&self) -> Value {
        let mut map: serde_json::Map<String, Value> = self.data.clone().into_iter().collect();
        map.insert("timestamp".to_string(), Value::String(self.timestamp.clone()));
        Value::Object(map)
    }

    fn for_pipeline(event_type: &str, pipeline: &str, run_id: Uuid) -> Self {
        Self::new(event_type)
            .add_data("pipeline", serde_json::json!(pipeline))
            .add_data("run_id", serde_json::json!(run_id.to_string()))
    }

    fn for_step(event_type: &str, pipeline: &str, run_id: Uuid, index: usize, step: &str) -> Self {
        Self::for_pipeline(event_type, pipeline, run_id)
            .add_data("index", serde_json::json!(index))
            .add_data("step", serde_json::json!(step))
    }

    /// Creates a "pipeline.started" event.
    #[must_use]
    pub fn pipeline_started(pipeline: &str, run_id: Uuid, step_count: usize) -> Self {
        Self::for_pipeline("pipeline.started", pipeline, run_id)
            .add_data("step_count", serde_json::json!(step_count))
    }

    /// Creates a "pipeline.completed" event.
    #[must_use]
    pub fn pipeline_completed(pipeline: &str, run_id: Uuid, duration_ms: f64) -> Self {
        Self::for_pipeline("pipeline.completed", pipeline, run_id)
            .add_data("duration_ms", serde_json::json!(duration_ms))
    }

    /// Creates a "pipeline.failed" event.
    #[must_use]
    pub fn pipeline_failed(pipeline: &str, run_id: Uuid, index: usize, error: &str) -> Self {
        Self::for_pipeline("pipeline.failed", pipeline, run_id)
            .add_data("index", serde_json::json!(index))
            .add_data("error", serde_json::json!(error))
    }

    /// Creates a "step.started" event.
    #[must_use]
    pub fn step_started(pipeline: &str, run_id: Uuid, index: usize, step: &str) -> Self {
        Self::for_step("step.started", pipeline, run_id, index, step)
    }

    /// Creates a "step.completed" event.
    #[must_use]
    pub fn step_completed(
        pipeline: &str,
        run_id: Uuid,
        index: usize,
        step: &str,
        output: &Value,
        duration_ms: f64,
    ) -> Self {
        Self::for_step("step.completed", pipeline, run_id, index, step)
            .add_data("output", output.clone())
            .add_data("duration_ms", serde_json::json!(duration_ms))
    }

    /// Creates a "step.failed" event.
    #[must_use]
    pub fn step_failed(pipeline: &str, run_id: Uuid, index: usize, step: &str, error: &str) -> Self {
        Self::for_step("step.failed", pipeline, run_id, index, step)
            .add_data("error", serde_json::json!(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = StepEvent::new("test.event");
        assert_eq!(event.event_type, "test.event");
        assert!(event.data.is_empty());
        assert!(event.timestamp.contains('T'));
    }

    #[test]
    fn test_step_completed_payload() {
        let run_id = Uuid::new_v4();
        let event = StepEvent::step_completed(
            "beans",
            run_id,
            0,
            "shop",
            &serde_json::json!("pinto"),
            1.5,
        );

        assert_eq!(event.event_type, "step.completed");
        let payload = event.payload();
        assert_eq!(payload["pipeline"], "beans");
        assert_eq!(payload["run_id"], run_id.to_string());
        assert_eq!(payload["index"], 0);
        assert_eq!(payload["step"], "shop");
        assert_eq!(payload["output"], "pinto");
        assert!(payload["timestamp"].is_string());
    }

    #[test]
    fn test_pipeline_failed_payload() {
        let event = StepEvent::pipeline_failed("beans", Uuid::new_v4(), 1, "beans too old");
        assert_eq!(event.data.get("index"), Some(&serde_json::json!(1)));
        assert_eq!(event.data.get("error"), Some(&serde_json::json!("beans too old")));
    }

    #[test]
    fn test_event_serialization() {
        let event = StepEvent::new("test").add_data("x", serde_json::json!(1));
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: StepEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(event.event_type, deserialized.event_type);
        assert_eq!(deserialized.data.get("x"), Some(&serde_json::json!(1)));
    }
}
