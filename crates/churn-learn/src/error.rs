//! Error types for the training library.

use churn_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LearnError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LearnError>;

/// Every failure while fitting or evaluating is fatal to the training step.
impl From<LearnError> for DomainError {
    fn from(e: LearnError) -> Self {
        DomainError::TrainingFailure(e.to_string())
    }
}
