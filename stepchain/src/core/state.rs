//! Per-run state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The state of a single pipeline run.
///
/// ```text
/// NotStarted -> Running(0) -> Running(1) -> ... -> Completed
///                    \             \
///                     Failed(0)     Failed(1)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "step_index", rename_all = "snake_case")]
pub enum RunState {
    /// The run has not been invoked yet.
    #[default]
    NotStarted,
    /// The step at this index is in flight.
    Running(usize),
    /// Every step resolved.
    Completed,
    /// The step at this index failed.
    Failed(usize),
}

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid run transition from {from} ({action})")]
pub struct InvalidTransition {
    /// The state the transition started from.
    pub from: RunState,
    /// The attempted action.
    pub action: &'static str,
}

impl RunState {
    /// `NotStarted -> Running(0)`.
    pub fn start(self) -> Result<Self, InvalidTransition> {
        match self {
            Self::NotStarted => Ok(Self::Running(0)),
            from => Err(InvalidTransition { from, action: "start" }),
        }
    }

    /// Records the resolution of the running step.
    ///
    /// Moves to the next step, or to `Completed` when `step_count` steps
    /// have resolved.
    pub fn resolve(self, step_count: usize) -> Result<Self, InvalidTransition> {
        match self {
            Self::Running(i) if i + 1 < step_count => Ok(Self::Running(i + 1)),
            Self::Running(i) if i + 1 == step_count => Ok(Self::Completed),
            from => Err(InvalidTransition { from, action: "resolve" }),
        }
    }

    /// `Running(i) -> Failed(i)`.
    pub fn fail(self) -> Result<Self, InvalidTransition> {
        match self {
            Self::Running(i) => Ok(Self::Failed(i)),
            from => Err(InvalidTransition { from, action: "fail" }),
        }
    }

    /// Returns the index of the running or failed step.
    #[must_use]
    pub fn step_index(&self) -> Option<usize> {
        match self {
            Self::Running(i) | Self::Failed(i) => Some(*i),
            Self::NotStarted | Self::Completed => None,
        }
    }

    /// Returns true if the run has finished.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Running(i) => write!(f, "running({i})"),
            Self::Completed => write!(f, "completed"),
            Self::Failed(i) => write!(f, "failed({i})"),
        }
    }
}
