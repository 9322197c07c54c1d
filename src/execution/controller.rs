//! Thread-safe lifecycle controller for a single automation run.
//!
//! The controller owns the run's [`ExecutionState`] behind one mutex. Every
//! transition happens under that lock and wakes all waiters on the paired
//! condition variable, so a worker blocked in [`ExecutionController::check_pause_point`]
//! always re-reads the state written by the call that woke it.
//!
//! Cancellation is cooperative: a worker only notices a stop at its next pause
//! point, so cancellation latency is bounded by the work done between two
//! consecutive checks. The controller never imposes a timeout of its own.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::errors::ExecutionError;
use super::types::ExecutionState;
use crate::telemetry::generate_run_id;

pub struct ExecutionController {
    run_id: String,
    state: Mutex<ExecutionState>,
    state_changed: Condvar,
}

impl Default for ExecutionController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExecutionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionController")
            .field("run_id", &self.run_id)
            .field("state", &self.state())
            .finish()
    }
}

impl ExecutionController {
    /// Create an idle controller with a fresh run id
    pub fn new() -> Self {
        Self::with_run_id(generate_run_id())
    }

    /// Create an idle controller tagged with the given run id
    pub fn with_run_id(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            state: Mutex::new(ExecutionState::Idle),
            state_changed: Condvar::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// IDLE → RUNNING. Any other state is rejected and left unchanged.
    pub fn start(&self) -> Result<(), ExecutionError> {
        self.transition("start", |state| match state {
            ExecutionState::Idle => Ok(Some(ExecutionState::Running)),
            other => Err(ExecutionError::InvalidState {
                operation: "start",
                state: other,
            }),
        })
    }

    /// RUNNING → PAUSED. A no-op from every other state; never fails.
    pub fn pause(&self) {
        let _ = self.transition("pause", |state| match state {
            ExecutionState::Running => Ok(Some(ExecutionState::Paused)),
            _ => Ok(None),
        });
    }

    /// PAUSED → RUNNING. Resuming anything that is not paused is rejected.
    pub fn resume(&self) -> Result<(), ExecutionError> {
        self.transition("resume", |state| match state {
            ExecutionState::Paused => Ok(Some(ExecutionState::Running)),
            other => Err(ExecutionError::InvalidState {
                operation: "resume",
                state: other,
            }),
        })
    }

    /// RUNNING or PAUSED → STOPPING, waking any worker blocked at a pause point.
    /// Idempotent and never fails.
    pub fn stop(&self) {
        let _ = self.transition("stop", |state| match state {
            ExecutionState::Running | ExecutionState::Paused => Ok(Some(ExecutionState::Stopping)),
            _ => Ok(None),
        });
    }

    /// Any state → IDLE. Also clears a poisoned lock, so pause points work
    /// again for the next run.
    pub fn reset(&self) {
        self.state.clear_poison();
        let _ = self.transition("reset", |_| Ok(Some(ExecutionState::Idle)));
    }

    /// Cooperation point for the worker thread.
    ///
    /// Returns immediately while RUNNING (or IDLE), fails with
    /// [`ExecutionError::Stopped`] once STOPPING is observed, and blocks while
    /// PAUSED until another thread resumes or stops the run. The wait re-checks
    /// the state after every wakeup, so spurious wakeups are harmless. A reset
    /// does not release the wait; only RUNNING or STOPPING does.
    ///
    /// A poisoned lock is reported as [`ExecutionError::Interrupted`], never as
    /// a normal return, until [`ExecutionController::reset`] clears it.
    pub fn check_pause_point(&self) -> Result<(), ExecutionError> {
        self.wait_at_pause_point(false)
    }

    /// Pause point for a worker inside a started run.
    ///
    /// Same as [`ExecutionController::check_pause_point`], except that IDLE
    /// means the run was reset under the worker: it fails with
    /// [`ExecutionError::Stopped`], and a reset releases a paused worker the
    /// same way. A reset run therefore always ends at its next pause point.
    pub fn check_run_pause_point(&self) -> Result<(), ExecutionError> {
        self.wait_at_pause_point(true)
    }

    fn wait_at_pause_point(&self, idle_ends_run: bool) -> Result<(), ExecutionError> {
        let releases = |state: ExecutionState| match state {
            ExecutionState::Running | ExecutionState::Stopping => true,
            ExecutionState::Idle => idle_ends_run,
            ExecutionState::Paused => false,
        };

        let mut state = self
            .state
            .lock()
            .map_err(|_| ExecutionError::Interrupted)?;

        if *state == ExecutionState::Paused {
            debug!(run_id = %self.run_id, "Worker blocked at pause point");
            while !releases(*state) {
                state = self
                    .state_changed
                    .wait(state)
                    .map_err(|_| ExecutionError::Interrupted)?;
            }
            debug!(run_id = %self.run_id, state = %*state, "Worker released from pause point");
        }

        match *state {
            ExecutionState::Stopping => Err(ExecutionError::Stopped),
            ExecutionState::Idle if idle_ends_run => {
                debug!(run_id = %self.run_id, "Run was reset, ending it at pause point");
                Err(ExecutionError::Stopped)
            }
            _ => Ok(()),
        }
    }

    pub fn state(&self) -> ExecutionState {
        *self.lock_state()
    }

    pub fn is_running(&self) -> bool {
        self.state() == ExecutionState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == ExecutionState::Paused
    }

    /// True once a stop has been requested and until the next reset
    pub fn is_stopped(&self) -> bool {
        self.state() == ExecutionState::Stopping
    }

    pub fn is_idle(&self) -> bool {
        self.state() == ExecutionState::Idle
    }

    // ExecutionState is a plain Copy value, so a panic elsewhere cannot leave it
    // half-written; lifecycle calls keep working on a poisoned lock.
    fn lock_state(&self) -> MutexGuard<'_, ExecutionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one transition under the lock. `decide` returns the next state,
    /// `None` for a permitted no-op, or the rejection.
    fn transition<F>(&self, operation: &'static str, decide: F) -> Result<(), ExecutionError>
    where
        F: FnOnce(ExecutionState) -> Result<Option<ExecutionState>, ExecutionError>,
    {
        let mut state = self.lock_state();
        let from = *state;

        match decide(from) {
            Ok(Some(to)) => {
                *state = to;
                self.state_changed.notify_all();
                drop(state);
                info!(run_id = %self.run_id, operation, from = %from, to = %to, "Execution state changed");
                Ok(())
            }
            Ok(None) => {
                drop(state);
                debug!(run_id = %self.run_id, operation, state = %from, "Execution state unchanged");
                Ok(())
            }
            Err(e) => {
                drop(state);
                warn!(run_id = %self.run_id, operation, state = %from, "Rejected execution transition: {}", e);
                Err(e)
            }
        }
    }
}
