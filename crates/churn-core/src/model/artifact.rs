//! Artifact neutral del flujo.
//!
//! Un `Artifact` es la unidad de datos intercambiada entre steps:
//! - `payload` es JSON genérico; el motor no interpreta su semántica. Lleva
//!   handles (rutas, claves) y nunca blobs binarios.
//! - `hash` lo calcula el engine sobre el JSON canonicalizado.
//! - `metadata` anota información auxiliar que no entra al hash.
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// JSON genérico sin semántica.
    GenericJson,
    /// Dataset que pasó el contrato de esquema.
    DatasetValidation,
    /// Modelo y preprocesador entrenados, aún en disco local.
    TrainedModel,
    /// Objetos publicados en el object storage.
    PersistedModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub hash: String,
    pub payload: Value,
    pub metadata: Option<Value>,
}

impl Artifact {
    /// Preferir `ArtifactSpec::into_artifact`; el hash lo asigna el engine.
    pub fn new_unhashed(kind: ArtifactKind, payload: Value, metadata: Option<Value>) -> Self {
        Self { kind,
               hash: String::new(),
               payload,
               metadata }
    }
}
