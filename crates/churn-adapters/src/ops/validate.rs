use churn_domain::{validate_frame, DataProfile, DatasetRef, DomainError, SchemaContract, ValidationReport};
use churn_storage::ObjectStore;
use log::info;

use super::fetch_frame;

/// Aplica el contrato al dataset referenciado. Un fallo no produce reportes.
pub fn validate_dataset(store: &dyn ObjectStore,
                        dataset: &DatasetRef,
                        label_column: &str,
                        min_rows: usize,
                        contract: &SchemaContract)
                        -> Result<(ValidationReport, DataProfile), DomainError> {
    let frame = fetch_frame(store, dataset)?;
    let (report, profile) = validate_frame(&frame, label_column, min_rows, contract)?;
    info!("Validation passed");
    Ok((report, profile))
}
