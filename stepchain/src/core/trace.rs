//! Execution trace and run outcome.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One resolved step in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Position of the step in the pipeline.
    pub index: usize,
    /// Name of the step.
    pub name: String,
    /// The resolved output.
    pub output: Value,
    /// How long the step took, in milliseconds.
    pub duration_ms: f64,
}

/// The ordered outputs produced during a single run.
///
/// A trace is created fresh for every run and never shared between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionTrace {
    entries: Vec<TraceEntry>,
}

impl ExecutionTrace {
    /// Creates an empty trace with room for `steps` entries.
    #[must_use]
    pub fn with_capacity(steps: usize) -> Self {
        Self {
            entries: Vec::with_capacity(steps),
        }
    }

    /// Appends the output of the next step.
    pub(crate) fn record(&mut self, entry: TraceEntry) {
        debug_assert_eq!(entry.index, self.entries.len());
        self.entries.push(entry);
    }

    /// Returns the entries in step order.
    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Returns the resolved outputs in step order.
    #[must_use]
    pub fn outputs(&self) -> Vec<Value> {
        self.entries.iter().map(|e| e.output.clone()).collect()
    }

    /// Returns the output of the step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|e| &e.output)
    }

    /// Returns the output of the last completed step.
    #[must_use]
    pub fn last(&self) -> Option<&Value> {
        self.entries.last().map(|e| &e.output)
    }

    /// Returns the number of completed steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no step has completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The result of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// Output of the final step.
    pub output: Value,
    /// Outputs of every step, in order.
    pub trace: ExecutionTrace,
    /// Total run time in milliseconds.
    pub duration_ms: f64,
}
