use churn_core::model::StepRuntime;
use churn_domain::{DomainError, ModelPrefix};
use churn_storage::{ObjectStore, JSON_CONTENT_TYPE};
use log::{info, warn};
use serde_json::{Map, Value};

use crate::artifacts::{FileHandle, PersistedBundle, TrainedBundle};

/// Cómo se trata un fallo al leer un miembro local del bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPolicy {
    /// El fallo aborta la persistencia.
    Strict,
    /// El fallo se registra y el miembro se sustituye por `{}`.
    Lenient,
}

/// Métricas tal como se publican. Con `Lenient`, un archivo ausente, alterado
/// o que no es JSON se reemplaza por un mapa vacío.
pub fn read_metrics(handle: &FileHandle, rt: &StepRuntime, policy: ReadPolicy) -> Result<Value, DomainError> {
    let parsed = handle.read(rt).and_then(|bytes| {
                                    serde_json::from_slice::<Value>(&bytes).map_err(|e| {
                                        DomainError::Workspace(format!("{} is not JSON: {e}", handle.path))
                                    })
                                });
    match (parsed, policy) {
        (Ok(v), _) => Ok(v),
        (Err(e), ReadPolicy::Strict) => Err(e),
        (Err(e), ReadPolicy::Lenient) => {
            warn!("metrics unavailable, publishing an empty mapping: {e}");
            Ok(Value::Object(Map::new()))
        }
    }
}

fn read_member(handle: &FileHandle, rt: &StepRuntime, policy: ReadPolicy) -> Result<Vec<u8>, DomainError> {
    match policy {
        ReadPolicy::Strict => handle.read(rt),
        ReadPolicy::Lenient => {
            let metrics = read_metrics(handle, rt, policy)?;
            serde_json::to_vec_pretty(&metrics).map_err(|e| DomainError::Workspace(format!("cannot encode metrics: {e}")))
        }
    }
}

/// Publica modelo, preprocesador y métricas bajo `prefix`, en ese orden.
///
/// Los tres miembros se leen antes de la primera subida, así un fallo local
/// no deja nada escrito. Si una subida falla después de otra exitosa el
/// resultado es `PersistPartialFailure` y lo ya escrito queda en el storage.
pub fn persist_bundle(store: &dyn ObjectStore,
                      bucket: &str,
                      prefix: &ModelPrefix,
                      bundle: &TrainedBundle,
                      rt: &StepRuntime)
                      -> Result<PersistedBundle, DomainError> {
    let members = [(prefix.model_key(), read_member(&bundle.model, rt, ReadPolicy::Strict)?),
                   (prefix.preprocessor_key(), read_member(&bundle.preprocessor, rt, ReadPolicy::Strict)?),
                   (prefix.metrics_key(), read_member(&bundle.metrics, rt, ReadPolicy::Lenient)?)];

    let mut written: Vec<String> = Vec::with_capacity(members.len());
    for (key, body) in &members {
        if let Err(e) = store.put_object(bucket, key, body, JSON_CONTENT_TYPE) {
            if written.is_empty() {
                return Err(e.into());
            }
            return Err(DomainError::PersistPartialFailure { written,
                                                            failed: key.clone(),
                                                            reason: e.to_string() });
        }
        info!("Uploaded: s3://{bucket}/{key}");
        written.push(key.clone());
    }

    Ok(PersistedBundle { bucket: bucket.to_string(),
                         prefix: prefix.to_string(),
                         model_key: prefix.model_key(),
                         preprocessor_key: prefix.preprocessor_key(),
                         metrics_key: prefix.metrics_key(),
                         schema_version: 1 })
}
