//! Tipado fuerte para `Artifact` manteniendo el núcleo agnóstico.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{Artifact, ArtifactKind};
use crate::errors::CoreEngineError;

/// Errores posibles al decodificar un artifact tipado.
#[derive(Debug, Error)]
pub enum ArtifactDecodeError {
    #[error("kind mismatch: expected {expected:?}, found {found:?}")]
    KindMismatch { expected: ArtifactKind, found: ArtifactKind },
    #[error("schema version mismatch: expected {expected}, found {found:?}")]
    VersionMismatch { expected: u32, found: Option<u32> },
    #[error("deserialize: {0}")]
    Deserialize(String),
    #[error("validation: {0}")]
    Validation(String),
}

impl From<ArtifactDecodeError> for CoreEngineError {
    fn from(e: ArtifactDecodeError) -> Self {
        CoreEngineError::ArtifactDecode(e.to_string())
    }
}

/// Especificación de un artifact tipado.
pub trait ArtifactSpec: Sized + Serialize + DeserializeOwned + Clone {
    const KIND: ArtifactKind;
    /// Incrementar en cambios incompatibles.
    const SCHEMA_VERSION: u32 = 1;

    /// Validación semántica ligera (sin efectos secundarios).
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn version_field_name() -> &'static str {
        "schema_version"
    }

    /// Serializa a `Artifact` sin hash (lo añade el engine).
    fn into_artifact(self) -> Result<Artifact, CoreEngineError> {
        let mut value = serde_json::to_value(&self).map_err(|e| CoreEngineError::Internal(format!("serialize artifact: {e}")))?;
        if let Value::Object(map) = &mut value {
            map.entry(Self::version_field_name().to_string())
               .or_insert(Value::from(Self::SCHEMA_VERSION));
        }
        Ok(Artifact::new_unhashed(Self::KIND, value, None))
    }

    /// Decodifica verificando kind, versión y validación.
    fn from_artifact(a: &Artifact) -> Result<Self, ArtifactDecodeError> {
        if a.kind != Self::KIND {
            return Err(ArtifactDecodeError::KindMismatch { expected: Self::KIND,
                                                           found: a.kind.clone() });
        }
        let found = a.payload
                     .get(Self::version_field_name())
                     .and_then(|v| v.as_u64())
                     .map(|v| v as u32);
        if found != Some(Self::SCHEMA_VERSION) {
            return Err(ArtifactDecodeError::VersionMismatch { expected: Self::SCHEMA_VERSION,
                                                              found });
        }
        let decoded: Self =
            serde_json::from_value(a.payload.clone()).map_err(|e| ArtifactDecodeError::Deserialize(e.to_string()))?;
        decoded.validate().map_err(ArtifactDecodeError::Validation)?;
        Ok(decoded)
    }
}
