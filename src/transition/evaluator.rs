//! Packages transitions into zero-argument success predicates.
//!
//! Function transitions are handed back untouched. Sequence transitions run
//! every step in order, whatever the intermediate outcomes, and succeed
//! exactly when the last step succeeds. Earlier steps still run for their side
//! effects; only the final step gates success.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use super::errors::TransitionError;
use super::traits::{StateTransition, StepExecutor};
use super::types::{Step, TransitionPredicate};
use crate::execution::ExecutionController;

#[derive(Clone)]
pub struct TransitionEvaluator {
    executor: Arc<dyn StepExecutor>,
    pause_points: Option<Arc<ExecutionController>>,
}

impl TransitionEvaluator {
    pub fn new(executor: Arc<dyn StepExecutor>) -> Self {
        Self {
            executor,
            pause_points: None,
        }
    }

    /// Check `controller` for pause/stop before every step of a sequence.
    /// A stop observed mid-sequence surfaces from the predicate as
    /// [`crate::ExecutionError::Stopped`] and the remaining steps are skipped.
    /// The controller must be started; a reset to IDLE counts as a stop.
    pub fn with_pause_points(mut self, controller: Arc<ExecutionController>) -> Self {
        self.pause_points = Some(controller);
        self
    }

    /// Build the success check for `transition`.
    ///
    /// Fails immediately for transitions exposing neither a function nor a
    /// step sequence, and for sequences whose step list is absent.
    pub fn to_predicate<T>(&self, transition: &T) -> Result<TransitionPredicate, TransitionError>
    where
        T: StateTransition + ?Sized,
    {
        if let Some(function) = transition.transition_function() {
            return Ok(Arc::clone(function));
        }

        let sequence = transition
            .task_sequence()
            .ok_or_else(|| TransitionError::Unsupported {
                name: transition.name().to_string(),
            })?;

        let steps: Arc<[Step]> = sequence
            .steps
            .ok_or_else(|| TransitionError::NullSteps {
                name: transition.name().to_string(),
            })?
            .into();

        let run = SequenceRun {
            name: transition.name().to_string(),
            steps,
            executor: Arc::clone(&self.executor),
            pause_points: self.pause_points.clone(),
        };
        Ok(Arc::new(move || run.evaluate()))
    }

    /// Build the predicate and invoke it once
    pub fn evaluate<T>(&self, transition: &T) -> Result<bool>
    where
        T: StateTransition + ?Sized,
    {
        let predicate = self.to_predicate(transition)?;
        predicate()
    }
}

struct SequenceRun {
    name: String,
    steps: Arc<[Step]>,
    executor: Arc<dyn StepExecutor>,
    pause_points: Option<Arc<ExecutionController>>,
}

impl SequenceRun {
    fn evaluate(&self) -> Result<bool> {
        let Some((last, preparatory)) = self.steps.split_last() else {
            debug!(transition = %self.name, "Empty step sequence evaluates to false");
            return Ok(false);
        };

        for (index, step) in preparatory.iter().enumerate() {
            // Outcome discarded: only the last step decides
            self.run_step(index, step)?;
        }

        let success = self.run_step(preparatory.len(), last)?;
        info!(
            transition = %self.name,
            steps = self.steps.len(),
            success,
            "Sequence transition evaluated"
        );
        Ok(success)
    }

    fn run_step(&self, index: usize, step: &Step) -> Result<bool> {
        if let Some(controller) = &self.pause_points {
            controller.check_run_pause_point()?;
        }

        let success = self.executor.execute(&step.config, &step.targets)?;
        debug!(
            transition = %self.name,
            step = index,
            action = %step.config.action,
            success,
            "Step executed"
        );
        Ok(success)
    }
}
