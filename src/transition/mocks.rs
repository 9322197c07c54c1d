// Mock implementations for testing the evaluator

use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

use super::traits::StepExecutor;
use super::types::{ActionConfig, TargetSet};

/// Scripted outcome for one step call
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Success,
    Failure,
    Error(String),
}

/// Step executor that replays scripted outcomes and records every call.
/// Calls beyond the script succeed.
#[derive(Debug, Default)]
pub struct ScriptedStepExecutor {
    outcomes: Mutex<VecDeque<ScriptedOutcome>>,
    executed: Mutex<Vec<(ActionConfig, TargetSet)>>,
}

impl ScriptedStepExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: &[bool]) -> Self {
        let executor = Self::new();
        for &success in outcomes {
            executor.push_outcome(if success {
                ScriptedOutcome::Success
            } else {
                ScriptedOutcome::Failure
            });
        }
        executor
    }

    pub fn push_outcome(&self, outcome: ScriptedOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn get_executed_steps(&self) -> Vec<(ActionConfig, TargetSet)> {
        self.executed.lock().unwrap().clone()
    }

    pub fn get_executed_actions(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|(config, _)| config.action.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

impl StepExecutor for ScriptedStepExecutor {
    fn execute(&self, config: &ActionConfig, targets: &TargetSet) -> Result<bool> {
        self.executed
            .lock()
            .unwrap()
            .push((config.clone(), targets.clone()));

        match self.outcomes.lock().unwrap().pop_front() {
            None | Some(ScriptedOutcome::Success) => Ok(true),
            Some(ScriptedOutcome::Failure) => Ok(false),
            Some(ScriptedOutcome::Error(message)) => Err(anyhow!(message)),
        }
    }
}
