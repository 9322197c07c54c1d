// Transition Module - declarative transitions evaluated to pass/fail
//
// A transition is either a caller-supplied predicate or an ordered list of
// scripted steps. The evaluator turns either form into a zero-argument
// predicate, driving steps through the injected StepExecutor.

pub mod types;
pub mod traits;
pub mod errors;
pub mod evaluator;
pub mod executor;
pub mod file;

#[cfg(test)]
pub mod mocks;


pub use types::{ActionConfig, FunctionTransition, SequenceTransition, Step, TargetSet, TaskSequence, TransitionPredicate};
pub use traits::{StateTransition, StepExecutor};
pub use errors::TransitionError;
pub use evaluator::TransitionEvaluator;
pub use executor::DryRunExecutor;
pub use file::TransitionFile;
