//! Core error taxonomy shared by every component in the engine.
//!
//! Every fallible core operation returns `Result<T, EngineError>`. The CLI
//! and other outer-layer wiring converts these into `anyhow::Error` reports
//! at the process boundary; the core itself never depends on `anyhow`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("required input was empty")]
    EmptyInput,

    #[error("validation failed for {input:?}: {constraint}")]
    ValidationFailed { input: String, constraint: String },

    #[error("invalid format for {input:?}, expected {expected}")]
    InvalidFormat { input: String, expected: String },

    #[error("business rule violated: {rule} ({context})")]
    BusinessRuleViolation { rule: String, context: String },

    #[error("illegal state: current={current}, expected={expected}")]
    IllegalState { current: String, expected: String },

    #[error("command failed: {command}: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("communication with {target} failed: {details}")]
    CommunicationFailed { target: String, details: String },

    #[error("repository operation {operation} failed: {details}")]
    RepositoryError { operation: String, details: String },

    #[error("unexpected error during {operation}: {details}")]
    UnexpectedError { operation: String, details: String },

    #[error("operation {operation} cancelled")]
    CancellationRequested { operation: String },
}

impl EngineError {
    pub fn business_rule(rule: impl Into<String>, context: impl Into<String>) -> Self {
        EngineError::BusinessRuleViolation {
            rule: rule.into(),
            context: context.into(),
        }
    }

    pub fn validation(input: impl Into<String>, constraint: impl Into<String>) -> Self {
        EngineError::ValidationFailed {
            input: input.into(),
            constraint: constraint.into(),
        }
    }
}

/// An aggregate of per-key failures, used where one logical operation
/// (e.g. `capture_many`) fans out over several targets and any subset may fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFailure {
    pub failures: Vec<(String, EngineError)>,
}

impl std::fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {} targets failed: ", self.failures.len(), self.failures.len())?;
        for (i, (key, err)) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{key}: {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

pub type Result<T> = std::result::Result<T, EngineError>;
