// Declarative transition files (JSON)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::TransitionError;
use super::evaluator::TransitionEvaluator;
use super::types::SequenceTransition;

/// An ordered list of sequence transitions, as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionFile {
    #[serde(default)]
    pub transitions: Vec<SequenceTransition>,
}

impl TransitionFile {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid transition file")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transition file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse transition file {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build every predicate without running anything, collecting each defect
    pub fn validate(&self, evaluator: &TransitionEvaluator) -> Vec<TransitionError> {
        self.transitions
            .iter()
            .filter_map(|transition| evaluator.to_predicate(transition).err())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
