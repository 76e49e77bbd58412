use thiserror::Error;

/// Errors raised by navigation and reset guards
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GuardError {
    /// A configuration flag or policy rule rejected the transition
    #[error("Navigation denied: {reason}")]
    NavigationDenied { reason: String },

    /// A business rule (reset gates, submission state) rejected the intent
    #[error("Business rule violation: {reason}")]
    BusinessRuleViolation { reason: String },

    /// The requested target lies outside the flow
    #[error("Invalid target step {index}: {reason}")]
    InvalidTarget { index: usize, reason: String },

    /// The requested target step is disabled
    #[error("Step {index} is disabled")]
    StepDisabled { index: usize },
}

pub type GuardResult<T> = Result<T, GuardError>;

/// Create a navigation-denied guard error
pub fn navigation_denied(reason: impl Into<String>) -> GuardError {
    GuardError::NavigationDenied {
        reason: reason.into(),
    }
}

/// Create a business-rule-violation guard error
pub fn business_rule_violation(reason: impl Into<String>) -> GuardError {
    GuardError::BusinessRuleViolation {
        reason: reason.into(),
    }
}

/// Errors raised by the persistence port
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// State could not be serialized or deserialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying storage collaborator failed
    #[error("Storage operation failed: {reason}")]
    StorageFailed { reason: String },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Create a storage-failed persistence error
pub fn storage_failed(reason: impl Into<String>) -> PersistenceError {
    PersistenceError::StorageFailed {
        reason: reason.into(),
    }
}

/// Top-level state machine error
#[derive(Debug, Error)]
pub enum StateMachineError {
    #[error("Guard check failed: {0}")]
    Guard(#[from] GuardError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
