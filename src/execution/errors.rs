use thiserror::Error;

use super::types::ExecutionState;

/// Errors raised by the execution controller
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// `start()` outside IDLE or `resume()` outside PAUSED. The state is left untouched.
    #[error("Cannot {operation} execution while it is {state}")]
    InvalidState {
        operation: &'static str,
        state: ExecutionState,
    },
    /// Cancellation signal from a pause point once a stop has been observed
    #[error("Execution stopped")]
    Stopped,
    /// The blocked pause-point wait was broken by a thread that panicked while
    /// holding the controller lock
    #[error("Pause point wait interrupted: controller lock poisoned")]
    Interrupted,
}

impl ExecutionError {
    /// Whether this is the expected stop signal rather than a defect
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ExecutionError::Stopped)
    }
}

/// Checks an error coming back through a step executor or predicate for the stop signal
pub fn is_cancellation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ExecutionError>()
        .is_some_and(ExecutionError::is_cancellation)
}
