//! Artifacts tipados del pipeline de churn.
//!
//! Los archivos locales se referencian con rutas relativas al directorio de
//! la ejecución (`<workspace>/<run_id>`), así el payload (y su hash) no
//! depende del run id ni del workspace.

use std::fs;
use std::path::{Path, PathBuf};

use churn_core::model::{ArtifactKind, StepRuntime};
use churn_core::typed_artifact;
use churn_domain::{DatasetRef, DomainError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Archivo local producido por un step, con su digest sha256.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub path: String,
    pub sha256: String,
}

fn run_dir(rt: &StepRuntime) -> &Path {
    rt.output_dir.parent().unwrap_or(&rt.output_dir)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

impl FileHandle {
    /// Escribe `name` en el directorio del step.
    pub fn write(rt: &StepRuntime, name: &str, bytes: &[u8]) -> Result<Self, DomainError> {
        let target = rt.output_dir.join(name);
        fs::write(&target, bytes).map_err(|e| DomainError::Workspace(format!("cannot write {}: {e}", target.display())))?;
        let relative = target.strip_prefix(run_dir(rt))
                             .unwrap_or(&target)
                             .components()
                             .map(|c| c.as_os_str().to_string_lossy().into_owned())
                             .collect::<Vec<_>>()
                             .join("/");
        Ok(Self { path: relative,
                  sha256: sha256_hex(bytes) })
    }

    pub fn resolve(&self, rt: &StepRuntime) -> PathBuf {
        run_dir(rt).join(&self.path)
    }

    /// Lee el archivo y verifica que el contenido sea el que se registró.
    pub fn read(&self, rt: &StepRuntime) -> Result<Vec<u8>, DomainError> {
        let path = self.resolve(rt);
        let bytes = fs::read(&path).map_err(|e| DomainError::Workspace(format!("cannot read {}: {e}", path.display())))?;
        let found = sha256_hex(&bytes);
        if found != self.sha256 {
            return Err(DomainError::Workspace(format!("{} changed since it was written (sha256 {found}, expected {})",
                                                      path.display(),
                                                      self.sha256)));
        }
        Ok(bytes)
    }
}

// Dataset que cumplió el contrato. Es el input del Trainer cuando ambos
// steps están en el mismo grafo.
typed_artifact!(ValidatedDataset {
    dataset: DatasetRef,
    label_column: String,
    rows: usize,
    schema_report: FileHandle,
    profile_report: FileHandle,
} kind: ArtifactKind::DatasetValidation);

// Bundle entrenado, todavía en disco local.
typed_artifact!(TrainedBundle {
    model: FileHandle,
    preprocessor: FileHandle,
    metrics: FileHandle,
} kind: ArtifactKind::TrainedModel);

// Keys publicadas en el object storage.
typed_artifact!(PersistedBundle {
    bucket: String,
    prefix: String,
    model_key: String,
    preprocessor_key: String,
    metrics_key: String,
} kind: ArtifactKind::PersistedModel);
