// Core types for the execution lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of a single automation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    /// Not started, or reset after a previous run
    #[default]
    Idle,
    /// Worker is free to make progress
    Running,
    /// Worker blocks at its next pause point until resumed or stopped
    Paused,
    /// Stop requested; the worker is cancelled at its next pause point
    Stopping,
}

impl ExecutionState {
    /// Whether a run is in flight (started and not yet reset)
    pub fn is_active(&self) -> bool {
        !matches!(self, ExecutionState::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionState::Idle => "IDLE",
            ExecutionState::Running => "RUNNING",
            ExecutionState::Paused => "PAUSED",
            ExecutionState::Stopping => "STOPPING",
        }
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
