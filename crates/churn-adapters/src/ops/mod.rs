//! Operaciones del pipeline sobre un `ObjectStore` ya conectado.
//! No conocen al motor: reciben configuración explícita y devuelven
//! `DomainError`.

pub mod persist;
pub mod train;
pub mod validate;

pub use persist::{persist_bundle, read_metrics, ReadPolicy};
pub use train::train_from_store;
pub use validate::validate_dataset;

use churn_domain::{DatasetRef, DomainError, Frame};
use churn_storage::ObjectStore;
use log::debug;

/// Descarga el CSV completo y lo carga como `Frame`.
pub fn fetch_frame(store: &dyn ObjectStore, dataset: &DatasetRef) -> Result<Frame, DomainError> {
    let bytes = store.get_object(&dataset.bucket, &dataset.key)?;
    debug!("fetched {dataset} ({} bytes)", bytes.len());
    Frame::from_csv_bytes(&bytes)
}
