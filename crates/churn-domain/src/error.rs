use std::collections::BTreeSet;

use thiserror::Error;

/// Reglas del contrato de esquema. Cada variante enumera todos los elementos
/// que la violan, no sólo el primero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("dataset too small: {rows} rows, at least {min_rows} required")]
    TooFewRows { rows: usize, min_rows: usize },
    #[error("duplicate columns: {}", .0.join(", "))]
    DuplicateColumns(Vec<String>),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("invalid label values: {}", join_set(.0))]
    InvalidLabelValues(BTreeSet<String>),
}

fn join_set(values: &BTreeSet<String>) -> String {
    values.iter().map(|v| format!("{v:?}")).collect::<Vec<_>>().join(", ")
}

impl ContractViolation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooFewRows { .. } => "contract_violation.too_few_rows",
            Self::DuplicateColumns(_) => "contract_violation.duplicate_columns",
            Self::MissingColumns(_) => "contract_violation.missing_columns",
            Self::InvalidLabelValues(_) => "contract_violation.invalid_label_values",
        }
    }
}

/// Error del dominio del pipeline de churn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
    /// Conectividad o autenticación con el object storage. Reintentable.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("training failure: {0}")]
    TrainingFailure(String),
    /// Una subida estricta falló después de que otra del mismo bundle ya se
    /// había escrito. No hay rollback: `written` queda en el storage.
    #[error("partial persist: wrote [{}] then failed on {failed}: {reason}", .written.join(", "))]
    PersistPartialFailure { written: Vec<String>, failed: String, reason: String },
    #[error("malformed dataset: {0}")]
    MalformedDataset(String),
    #[error("configuration: {0}")]
    Configuration(String),
    /// Lectura o escritura de archivos locales del step.
    #[error("workspace io: {0}")]
    Workspace(String),
}

impl DomainError {
    /// Código estable para operadores y eventos.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ContractViolation(v) => v.code(),
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::TrainingFailure(_) => "training_failure",
            Self::PersistPartialFailure { .. } => "persist_partial_failure",
            Self::MalformedDataset(_) => "malformed_dataset",
            Self::Configuration(_) => "configuration",
            Self::Workspace(_) => "workspace_io",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// Fallos atribuibles al dato de entrada.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ContractViolation(_) | Self::MalformedDataset(_))
    }
}

impl From<csv::Error> for DomainError {
    fn from(e: csv::Error) -> Self {
        DomainError::MalformedDataset(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_enumerate_every_item() {
        let e = ContractViolation::MissingColumns(vec!["tenure".into(), "Contract".into()]);
        assert_eq!(e.to_string(), "missing required columns: tenure, Contract");

        let e = ContractViolation::InvalidLabelValues(["Unknown".to_string(), "maybe".to_string()].into());
        assert_eq!(e.to_string(), r#"invalid label values: "Unknown", "maybe""#);

        let e = DomainError::PersistPartialFailure { written: vec!["p/model.json".into()],
                                                     failed: "p/preprocessor.json".into(),
                                                     reason: "timeout".into() };
        assert!(e.to_string().contains("wrote [p/model.json]"));
        assert_eq!(e.code(), "persist_partial_failure");
        assert!(!e.is_retryable());
    }
}
