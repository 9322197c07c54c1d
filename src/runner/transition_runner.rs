//! Drives an ordered list of transitions under an [`ExecutionController`].
//!
//! The runner checks the controller before every transition (and, when
//! enabled, before every step), so a stop takes effect within one transition
//! or one step. The stop signal ends the run cleanly as
//! [`RunOutcome::Stopped`]; every other error is returned to the caller.
//! A controller reset to IDLE mid-run also ends the run as stopped, and so
//! does calling [`TransitionRunner::run`] on a controller that was never started.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::types::{RunOutcome, RunReport, TransitionRecord};
use crate::config::RunnerConfig;
use crate::execution::{is_cancellation, ExecutionController};
use crate::telemetry::create_run_span;
use crate::transition::{StateTransition, StepExecutor, TransitionEvaluator};

pub struct TransitionRunner {
    controller: Arc<ExecutionController>,
    executor: Arc<dyn StepExecutor>,
    pause_point_per_step: bool,
    stop_on_failure: bool,
}

impl TransitionRunner {
    pub fn new(controller: Arc<ExecutionController>, executor: Arc<dyn StepExecutor>) -> Self {
        Self {
            controller,
            executor,
            pause_point_per_step: false,
            stop_on_failure: false,
        }
    }

    pub fn from_config(
        controller: Arc<ExecutionController>,
        executor: Arc<dyn StepExecutor>,
        config: &RunnerConfig,
    ) -> Self {
        Self::new(controller, executor)
            .with_pause_point_per_step(config.pause_point_per_step)
            .with_stop_on_failure(config.stop_on_failure)
    }

    pub fn with_pause_point_per_step(mut self, enabled: bool) -> Self {
        self.pause_point_per_step = enabled;
        self
    }

    pub fn with_stop_on_failure(mut self, enabled: bool) -> Self {
        self.stop_on_failure = enabled;
        self
    }

    pub fn controller(&self) -> &Arc<ExecutionController> {
        &self.controller
    }

    /// Start the controller, then run. Fails if the controller is not idle.
    pub fn start_and_run<T: StateTransition>(&self, transitions: &[T]) -> Result<RunReport> {
        self.controller.start()?;
        self.run(transitions)
    }

    /// Evaluate `transitions` in order on the calling thread. The controller
    /// must already be started.
    pub fn run<T: StateTransition>(&self, transitions: &[T]) -> Result<RunReport> {
        let run_id = self.controller.run_id().to_string();
        let span = create_run_span(&run_id, transitions.len());
        let _guard = span.enter();

        let evaluator = self.evaluator();
        let mut records = Vec::with_capacity(transitions.len());

        for transition in transitions {
            if let Err(e) = self.controller.check_run_pause_point() {
                if e.is_cancellation() {
                    return Ok(self.stopped(run_id, records));
                }
                return Err(e.into());
            }

            let name = transition.name().to_string();
            let started_at = Utc::now();
            let success = match evaluator.evaluate(transition) {
                Ok(success) => success,
                Err(e) if is_cancellation(&e) => return Ok(self.stopped(run_id, records)),
                Err(e) => return Err(e.context(format!("Transition '{}' failed", name))),
            };

            records.push(TransitionRecord {
                name: name.clone(),
                success,
                started_at,
                finished_at: Utc::now(),
            });

            if !success && self.stop_on_failure {
                warn!(transition = %name, "Transition failed, aborting run");
                return Ok(RunReport {
                    run_id,
                    outcome: RunOutcome::Aborted { transition: name },
                    records,
                });
            }
        }

        let report = RunReport {
            run_id,
            outcome: RunOutcome::Completed,
            records,
        };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Run completed"
        );
        Ok(report)
    }

    fn evaluator(&self) -> TransitionEvaluator {
        let evaluator = TransitionEvaluator::new(Arc::clone(&self.executor));
        if self.pause_point_per_step {
            evaluator.with_pause_points(Arc::clone(&self.controller))
        } else {
            evaluator
        }
    }

    fn stopped(&self, run_id: String, records: Vec<TransitionRecord>) -> RunReport {
        info!(evaluated = records.len(), "Run stopped at pause point");
        RunReport {
            run_id,
            outcome: RunOutcome::Stopped,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{ExecutionError, ExecutionState};
    use crate::transition::{DryRunExecutor, FunctionTransition, SequenceTransition, Step};

    fn runner() -> TransitionRunner {
        TransitionRunner::new(Arc::new(ExecutionController::new()), Arc::new(DryRunExecutor))
    }

    fn sequence(name: &str, last_succeeds: bool) -> SequenceTransition {
        SequenceTransition::new(
            name,
            vec![
                Step::new("click").with_option("simulate", false),
                Step::new("find").with_option("simulate", last_succeeds),
            ],
        )
    }

    #[test]
    fn test_run_completes_and_records_every_transition() {
        let runner = runner();
        let transitions = vec![sequence("a", true), sequence("b", false), sequence("c", true)];

        let report = runner.start_and_run(&transitions).unwrap();
        assert!(report.is_completed());
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        let names: Vec<_> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(report.run_id, runner.controller().run_id());
        assert_eq!(runner.controller().state(), ExecutionState::Running);
    }

    #[test]
    fn test_stop_on_failure_aborts() {
        let runner = runner().with_stop_on_failure(true);
        let transitions = vec![sequence("a", true), sequence("b", false), sequence("c", true)];

        let report = runner.start_and_run(&transitions).unwrap();
        assert_eq!(
            report.outcome,
            RunOutcome::Aborted {
                transition: "b".to_string()
            }
        );
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn test_stopped_controller_ends_run_cleanly() {
        let runner = runner();
        runner.controller().start().unwrap();
        runner.controller().stop();

        let report = runner.run(&[sequence("a", true)]).unwrap();
        assert!(report.is_stopped());
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_stop_requested_by_a_transition() {
        let controller = Arc::new(ExecutionController::new());
        let stopper = Arc::clone(&controller);
        let transitions: Vec<Box<dyn StateTransition>> = vec![
            Box::new(FunctionTransition::new("stop", move || {
                stopper.stop();
                Ok(true)
            })),
            Box::new(sequence("never", true)),
        ];

        let runner = TransitionRunner::new(controller, Arc::new(DryRunExecutor));
        let report = runner.start_and_run(&transitions).unwrap();
        assert!(report.is_stopped());
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "stop");
    }

    #[test]
    fn test_reset_by_a_transition_ends_run() {
        let controller = Arc::new(ExecutionController::new());
        let resetter = Arc::clone(&controller);
        let transitions: Vec<Box<dyn StateTransition>> = vec![
            Box::new(FunctionTransition::new("reset", move || {
                resetter.reset();
                resetter.stop();
                Ok(true)
            })),
            Box::new(sequence("never", true)),
        ];

        let runner = TransitionRunner::new(controller, Arc::new(DryRunExecutor));
        let report = runner.start_and_run(&transitions).unwrap();
        assert!(report.is_stopped());
        assert_eq!(report.records.len(), 1);
        assert!(runner.controller().is_idle());
    }

    #[test]
    fn test_run_on_unstarted_controller_stops_immediately() {
        let runner = runner();
        let report = runner.run(&[sequence("a", true)]).unwrap();
        assert!(report.is_stopped());
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_start_and_run_requires_idle_controller() {
        let runner = runner();
        runner.controller().start().unwrap();

        let err = runner.start_and_run(&[sequence("a", true)]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExecutionError>(),
            Some(ExecutionError::InvalidState { operation: "start", .. })
        ));
    }

    #[test]
    fn test_defects_propagate_with_transition_name() {
        let runner = runner();
        let err = runner
            .start_and_run(&[SequenceTransition::without_steps("broken")])
            .unwrap_err();
        assert_eq!(err.to_string(), "Transition 'broken' failed");
        assert!(err.chain().any(|cause| cause.to_string().contains("has no step list")));
    }
}
