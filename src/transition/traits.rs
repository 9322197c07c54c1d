// Traits for dependency injection - the evaluator only sees these seams

use anyhow::Result;

#[cfg(test)]
use mockall::automock;

use super::types::{ActionConfig, TargetSet, TaskSequence, TransitionPredicate};

/// Performs one scripted action.
///
/// Returns the action's success flag. An `Err` is reserved for unexpected
/// failures and is propagated untouched to whoever evaluates the transition.
#[cfg_attr(test, automock)]
pub trait StepExecutor: Send + Sync {
    fn execute(&self, config: &ActionConfig, targets: &TargetSet) -> Result<bool>;
}

/// A transition the evaluator can package into a predicate.
///
/// When both accessors return something, the function takes priority.
pub trait StateTransition {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Caller-supplied success predicate, for function-based transitions
    fn transition_function(&self) -> Option<&TransitionPredicate> {
        None
    }

    /// Step list, for sequence-based transitions
    fn task_sequence(&self) -> Option<TaskSequence<'_>> {
        None
    }
}

impl<T: StateTransition + ?Sized> StateTransition for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn transition_function(&self) -> Option<&TransitionPredicate> {
        (**self).transition_function()
    }

    fn task_sequence(&self) -> Option<TaskSequence<'_>> {
        (**self).task_sequence()
    }
}

impl<T: StateTransition + ?Sized> StateTransition for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn transition_function(&self) -> Option<&TransitionPredicate> {
        (**self).transition_function()
    }

    fn task_sequence(&self) -> Option<TaskSequence<'_>> {
        (**self).task_sequence()
    }
}
