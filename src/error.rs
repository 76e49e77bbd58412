use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum StepflowError {
    NavigationError(String),
    ValidationError(String),
    PersistenceError(String),
    SubmissionError(String),
    ConfigurationError(String),
    RegistryError(String),
}

impl fmt::Display for StepflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepflowError::NavigationError(msg) => write!(f, "Navigation error: {msg}"),
            StepflowError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            StepflowError::PersistenceError(msg) => write!(f, "Persistence error: {msg}"),
            StepflowError::SubmissionError(msg) => write!(f, "Submission error: {msg}"),
            StepflowError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            StepflowError::RegistryError(msg) => write!(f, "Registry error: {msg}"),
        }
    }
}

impl std::error::Error for StepflowError {}

pub type Result<T> = std::result::Result<T, StepflowError>;
