//! Errores del object storage.
//! Cualquier variante llega al pipeline como `StorageUnavailable`.

use churn_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<StorageError> for DomainError {
    fn from(e: StorageError) -> Self {
        DomainError::StorageUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_storage_error_is_retryable_upstream() {
        let errors = [StorageError::NotFound { bucket: "dataset".into(),
                                               key: "churn/v1/raw/train.csv".into() },
                      StorageError::Unauthorized("blank credential".into()),
                      StorageError::Unavailable("connection refused".into()),
                      StorageError::Io("disk full".into())];
        for e in errors {
            let d: DomainError = e.into();
            assert!(d.is_retryable());
            assert_eq!(d.code(), "storage_unavailable");
        }
    }
}
