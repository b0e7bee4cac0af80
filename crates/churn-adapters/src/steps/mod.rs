//! Steps tipados del pipeline de churn.
//!
//! Cada step guarda sus params base (lo que `describe()` muestra y lo que
//! entra en el fingerprint) y el provider de storage. La credencial nunca
//! está en los params: llega en `StepRuntime` por el `SecretBinding` del
//! grafo.

pub mod persist;
pub mod train;
pub mod validate;

pub use persist::{PersistParams, PersistStep};
pub use train::{TrainParams, TrainStep};
pub use validate::{ValidateParams, ValidateStep};

use churn_core::model::StepRuntime;
use churn_core::CoreEngineError;
use churn_domain::{DatasetRef, DomainError};
use churn_storage::{ObjectStore, ObjectStoreProvider};
use serde::{Deserialize, Serialize};

use crate::error::step_error;

pub const DEFAULT_S3_ENDPOINT: &str = "http://minio.minio.svc.cluster.local:9000";

/// Dónde está el CSV y cuál es su columna label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetParams {
    pub s3_endpoint: String,
    pub bucket: String,
    pub key: String,
    pub label_column: String,
}

impl Default for DatasetParams {
    fn default() -> Self {
        Self { s3_endpoint: DEFAULT_S3_ENDPOINT.to_string(),
               bucket: "dataset".to_string(),
               key: "churn/v1/raw/train.csv".to_string(),
               label_column: "Churn".to_string() }
    }
}

impl DatasetParams {
    pub fn dataset_ref(&self) -> Result<DatasetRef, CoreEngineError> {
        DatasetRef::new(&self.s3_endpoint, &self.bucket, &self.key).map_err(step_error)
    }
}

/// Cliente de storage con la credencial inyectada para este step.
pub(crate) fn connect(provider: &dyn ObjectStoreProvider,
                      endpoint: &str,
                      rt: &StepRuntime)
                      -> Result<Box<dyn ObjectStore>, CoreEngineError> {
    let credential = rt.credential
                       .as_ref()
                       .ok_or_else(|| CoreEngineError::SecretUnavailable("no credential injected for storage step".into()))?;
    provider.connect(endpoint, credential)
            .map_err(|e| step_error(DomainError::from(e)))
}

/// Serializa un reporte como JSON indentado.
pub(crate) fn pretty<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreEngineError> {
    serde_json::to_vec_pretty(value).map_err(|e| CoreEngineError::Internal(format!("serialize report: {e}")))
}
