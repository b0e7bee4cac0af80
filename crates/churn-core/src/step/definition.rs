use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::run_result::StepRunResult;
use crate::model::ExecutionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    Source,
    Transform,
    Sink,
    Check,
}

/// Interfaz neutral de un Step. Las implementaciones dependen sólo de input,
/// params y runtime.
pub trait StepDefinition: std::fmt::Debug {
    /// Identificador estable y único dentro del Flow.
    fn id(&self) -> &str;

    fn name(&self) -> &str {
        self.id()
    }

    /// Parámetros base deterministas, antes de la inyección.
    fn base_params(&self) -> Value;

    fn run(&self, ctx: &ExecutionContext) -> StepRunResult;

    fn kind(&self) -> StepKind;

    /// Si el step habla con el object storage (y por tanto necesita credencial).
    fn requires_storage(&self) -> bool {
        false
    }

    /// Nombre del tipo de artifact consumido (`None` para sources).
    fn input_type(&self) -> Option<&'static str> {
        None
    }

    fn output_type(&self) -> &'static str {
        "Artifact"
    }

    /// Hash de la definición del step (id, kind, params base e implementación).
    fn definition_hash(&self) -> String;
}
