use crate::{errors::CoreEngineError, model::Artifact};

/// Resultado neutro de ejecutar un step.
#[derive(Debug)]
pub enum StepRunResult {
    Success { outputs: Vec<Artifact> },
    Failure { error: CoreEngineError },
}
