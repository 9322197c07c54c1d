// Runner Module - drives transitions under an execution controller

pub mod types;
pub mod transition_runner;
pub mod watchdog;

pub use types::{RunOutcome, RunReport, TransitionRecord};
pub use transition_runner::TransitionRunner;
pub use watchdog::Watchdog;
