// Run Control Library - cooperative execution control for scripted automation runs
// This exposes the controller, the transition evaluator and the runner built on them

pub mod execution;
pub mod transition;
pub mod runner;
pub mod telemetry;
pub mod config;

// Re-export key types for easy access
pub use execution::{is_cancellation, ExecutionController, ExecutionError, ExecutionState};
pub use transition::{
    ActionConfig, DryRunExecutor, FunctionTransition, SequenceTransition, StateTransition, Step,
    StepExecutor, TargetSet, TaskSequence, TransitionError, TransitionEvaluator, TransitionFile,
    TransitionPredicate,
};
pub use runner::{RunOutcome, RunReport, TransitionRecord, TransitionRunner, Watchdog};
pub use telemetry::{init_telemetry, shutdown_telemetry, generate_run_id, create_run_span};
pub use config::{RunControlConfig, RunnerConfig, ObservabilityConfig};
