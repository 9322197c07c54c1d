// Result types produced by the transition runner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every transition was evaluated
    Completed,
    /// A stop was observed at a pause point
    Stopped,
    /// `stop_on_failure` ended the run at a transition that evaluated to false
    Aborted { transition: String },
}

/// Verdict and timing of one evaluated transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub name: String,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub records: Vec<TransitionRecord>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| !r.success).count()
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    pub fn is_stopped(&self) -> bool {
        self.outcome == RunOutcome::Stopped
    }
}
