use thiserror::Error;

/// Defects detected while turning a transition into a predicate
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Unsupported transition '{name}': it exposes neither a function nor a step sequence")]
    Unsupported { name: String },
    #[error("Sequence transition '{name}' has no step list")]
    NullSteps { name: String },
}
