use anyhow::Result;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

use crate::execution::ExecutionController;

/// Run-level timeout: stops the controller once `timeout` elapses unless
/// cancelled first. Dropping the watchdog cancels it.
pub struct Watchdog {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<bool>>,
}

impl Watchdog {
    pub fn spawn(controller: Arc<ExecutionController>, timeout: Duration) -> Result<Self> {
        let (cancel, cancelled) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("run-watchdog".to_string())
            .spawn(move || match cancelled.recv_timeout(timeout) {
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        run_id = %controller.run_id(),
                        ?timeout,
                        "Run timed out, requesting stop"
                    );
                    controller.stop();
                    true
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    debug!(run_id = %controller.run_id(), "Watchdog cancelled");
                    false
                }
            })?;

        Ok(Self {
            cancel: Some(cancel),
            handle: Some(handle),
        })
    }

    /// Disarm the watchdog. Returns whether it had already fired.
    pub fn cancel(mut self) -> bool {
        self.disarm()
    }

    fn disarm(&mut self) -> bool {
        // Dropping the sender wakes the timer thread
        self.cancel.take();
        self.handle
            .take()
            .map(|handle| handle.join().unwrap_or(false))
            .unwrap_or(false)
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.disarm();
    }
}
