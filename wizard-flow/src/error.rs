use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Step not found: {0}")]
    StepNotFound(String),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Validation already in progress for step: {0}")]
    ValidationInFlight(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WizardError>;
