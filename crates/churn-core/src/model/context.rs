use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Artifact, Credential};

/// Estado de plataforma que recibe cada step y que no forma parte de sus
/// params: identificador de ejecución, directorio local de salida y la
/// credencial inyectada (sólo en steps que usan storage).
#[derive(Debug, Clone)]
pub struct StepRuntime {
    pub run_id: String,
    pub output_dir: PathBuf,
    pub credential: Option<Credential>,
}

impl StepRuntime {
    pub fn new(run_id: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self { run_id: run_id.into(),
               output_dir: output_dir.into(),
               credential: None }
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// Contexto de ejecución entregado a `StepDefinition::run`.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Artifact del step anterior (`None` en el primer step).
    pub input: Option<Artifact>,
    /// Params ya inyectados.
    pub params: Value,
    pub runtime: StepRuntime,
}

impl ExecutionContext {
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.params.clone())
    }
}
