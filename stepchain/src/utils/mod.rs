//! Utility functions for run ids, timestamps and timing.

mod timer;
pub mod timestamps;

pub use timer::SpanTimer;
pub use timestamps::iso_timestamp;

use uuid::Uuid;

/// Generates a new random run id.
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}
