// Core types for transitions and their steps

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::traits::StateTransition;

/// Zero-argument success check produced for every transition
pub type TransitionPredicate = Arc<dyn Fn() -> anyhow::Result<bool> + Send + Sync>;

/// Configuration of one scripted action (click, type, find, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Action identifier understood by the step executor
    pub action: String,
    /// Free-form action options
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl ActionConfig {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            options: Map::new(),
        }
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

/// Objects a step acts on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSet {
    pub objects: Vec<String>,
}

impl TargetSet {
    pub fn new<I, S>(objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            objects: objects.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// One scripted action plus its targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub config: ActionConfig,
    #[serde(default, skip_serializing_if = "TargetSet::is_empty")]
    pub targets: TargetSet,
}

impl Step {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            config: ActionConfig::new(action),
            targets: TargetSet::default(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.options.insert(key.into(), value.into());
        self
    }

    pub fn with_targets<I, S>(mut self, objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = TargetSet::new(objects);
        self
    }
}

/// Borrowed view of a transition's step list. `steps` is `None` when the list
/// is absent, which is different from an empty list.
#[derive(Debug, Clone, Copy)]
pub struct TaskSequence<'a> {
    pub steps: Option<&'a [Step]>,
}

/// Transition whose success is decided by a caller-supplied predicate
#[derive(Clone)]
pub struct FunctionTransition {
    name: String,
    function: TransitionPredicate,
}

impl FunctionTransition {
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn() -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::from_predicate(name, Arc::new(function))
    }

    pub fn from_predicate(name: impl Into<String>, function: TransitionPredicate) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }

    pub fn function(&self) -> &TransitionPredicate {
        &self.function
    }
}

impl fmt::Debug for FunctionTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTransition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl StateTransition for FunctionTransition {
    fn name(&self) -> &str {
        &self.name
    }

    fn transition_function(&self) -> Option<&TransitionPredicate> {
        Some(&self.function)
    }
}

/// Transition made of ordered scripted steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceTransition {
    pub name: String,
    /// `None` models a missing step list (`"steps": null` or no `steps` key)
    #[serde(default)]
    steps: Option<Vec<Step>>,
}

impl SequenceTransition {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps: Some(steps),
        }
    }

    /// A sequence transition whose step list was never provided
    pub fn without_steps(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: None,
        }
    }

    pub fn steps(&self) -> Option<&[Step]> {
        self.steps.as_deref()
    }
}

impl StateTransition for SequenceTransition {
    fn name(&self) -> &str {
        &self.name
    }

    fn task_sequence(&self) -> Option<TaskSequence<'_>> {
        Some(TaskSequence {
            steps: self.steps.as_deref(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_json_shape() {
        let step = Step::new("click")
            .with_option("simulate", false)
            .with_targets(["login-button"]);

        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(
            value,
            json!({"action": "click", "options": {"simulate": false}, "targets": ["login-button"]})
        );

        let parsed: Step = serde_json::from_value(json!({"action": "find"})).unwrap();
        assert_eq!(parsed, Step::new("find"));
    }

    #[test]
    fn test_null_and_empty_steps_differ() {
        let absent: SequenceTransition = serde_json::from_value(json!({"name": "a", "steps": null})).unwrap();
        let missing: SequenceTransition = serde_json::from_value(json!({"name": "b"})).unwrap();
        let empty: SequenceTransition = serde_json::from_value(json!({"name": "c", "steps": []})).unwrap();

        assert!(absent.steps().is_none());
        assert!(missing.steps().is_none());
        assert_eq!(empty.steps(), Some(&[] as &[Step]));
    }
}
