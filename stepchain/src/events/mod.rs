//! Event sink system for observability.
//!
//! Every pipeline run reports its lifecycle (`pipeline.*` and `step.*`
//! events) to the sink configured on the pipeline.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
