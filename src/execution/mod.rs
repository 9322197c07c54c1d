// Execution Module - Cooperative Run Control
//
// One controller per automation run. Supervisory threads drive the lifecycle
// (start/pause/resume/stop/reset) while the worker thread cooperates through
// pause points.

pub mod types;
pub mod errors;
pub mod controller;

pub use types::ExecutionState;
pub use errors::{is_cancellation, ExecutionError};
pub use controller::ExecutionController;
