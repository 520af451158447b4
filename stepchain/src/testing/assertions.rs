//! Test assertions for run results.

use crate::core::ExecutionTrace;
use crate::errors::StepFailure;
use serde_json::Value;

/// Asserts that the trace holds exactly these outputs, in order.
pub fn assert_trace_outputs(trace: &ExecutionTrace, expected: &[Value]) {
    assert_eq!(
        trace.outputs(),
        expected,
        "Trace outputs differ from expected"
    );
}

/// Asserts that the run failed at `index` with a cause rendering as `cause`.
pub fn assert_failed_at<T: std::fmt::Debug>(
    result: &Result<T, StepFailure>,
    index: usize,
    cause: &str,
) {
    match result {
        Ok(value) => panic!("Expected failure at step {index}, got success: {value:?}"),
        Err(failure) => {
            assert_eq!(
                failure.step_index, index,
                "Expected failure at step {}, got step {}",
                index, failure.step_index
            );
            assert_eq!(failure.cause.to_string(), cause);
        }
    }
}
