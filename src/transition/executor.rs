// Step executor implementations

use anyhow::{bail, Result};
use serde_json::Value;
use tracing::info;

use super::traits::StepExecutor;
use super::types::{ActionConfig, TargetSet};

/// Executor for rehearsing transition files without an automation backend.
///
/// Each step is logged and reports the boolean in its `simulate` option
/// (`true` when absent).
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl DryRunExecutor {
    pub const SIMULATE_OPTION: &'static str = "simulate";
}

impl StepExecutor for DryRunExecutor {
    fn execute(&self, config: &ActionConfig, targets: &TargetSet) -> Result<bool> {
        let success = match config.option(Self::SIMULATE_OPTION) {
            None => true,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => bail!(
                "Step '{}' has a non-boolean '{}' option: {}",
                config.action,
                Self::SIMULATE_OPTION,
                other
            ),
        };

        info!(
            action = %config.action,
            targets = ?targets.objects,
            success,
            "Dry-run step"
        );
        Ok(success)
    }
}
