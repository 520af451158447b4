//! Shops for, soaks and cooks beans. Each resolved value is logged by the
//! executor; the binary reports the final dish.
//!
//! Usage: `make-beans [config.json]`

use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;
use stepchain::events::LoggingEventSink;
use stepchain::kitchen::kitchen_builder;
use stepchain::pipeline::ExecutorConfig;
use tracing_subscriber::EnvFilter;

/// Initialize structured logging.
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to the provided level.
fn init_logging(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ExecutorConfig::load(&path)
            .with_context(|| format!("loading executor config from {path}"))?,
        None => ExecutorConfig::default(),
    };
    init_logging(&config.log_level);

    let pipeline = kitchen_builder()
        .with_config(config)
        .with_event_sink(Arc::new(LoggingEventSink::debug()))
        .build()?;

    let outcome = match pipeline.run_traced(None).await {
        Ok(outcome) => outcome,
        Err(failure) => {
            tracing::error!(details = ?failure.to_dict(), "Kitchen run failed");
            return Err(failure.into());
        }
    };
    tracing::info!(
        run_id = %outcome.run_id,
        duration_ms = outcome.duration_ms,
        "{}",
        display_value(&outcome.output)
    );

    Ok(())
}

/// Renders strings without JSON quotes.
fn display_value(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}
