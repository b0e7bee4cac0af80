//! Errores específicos del core.
//!
//! Los errores de dominio viajan como `CoreEngineError::Step` con una clase
//! (`ErrorClass`) y un código estable; así el motor puede registrarlos en
//! `StepFailed` sin conocer la semántica del dominio.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clase de un error, usada por los operadores para decidir si reintentar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Fallo transitorio (storage caído, credencial rechazada). Reintentable.
    Retryable,
    /// El dato de entrada viola un contrato. Reintentar no sirve.
    Validation,
    /// Parámetros de ejecución inválidos (run id, prefijo). Hay que corregir
    /// la invocación.
    Configuration,
    /// Cualquier otro fallo terminal.
    Fatal,
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("flow already completed")]
    FlowCompleted,
    #[error("missing required input for step '{0}'")]
    MissingInputs(String),
    #[error("first step must be source kind")]
    FirstStepMustBeSource,
    #[error("flow has failed previously (stop-on-failure invariant)")]
    FlowHasFailed,
    #[error("flow definition has no steps")]
    EmptyDefinition,
    #[error("duplicate step id: {0}")]
    DuplicateStepId(String),
    #[error("steps require storage but no secret binding is attached: {0:?}")]
    MissingSecretBinding(Vec<String>),
    #[error("secret unavailable: {0}")]
    SecretUnavailable(String),
    #[error("artifact decode failed: {0}")]
    ArtifactDecode(String),
    #[error("invalid run id {0}")]
    InvalidRunId(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("[{code}] {message}")]
    Step { class: ErrorClass, code: String, message: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl CoreEngineError {
    /// Atajo para que los adaptadores reporten errores de dominio.
    pub fn step(class: ErrorClass, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Step { class,
                     code: code.into(),
                     message: message.into() }
    }

    pub fn class(&self) -> ErrorClass {
        classify_error(self)
    }
}

/// Clasifica un error del motor.
pub fn classify_error(err: &CoreEngineError) -> ErrorClass {
    match err {
        CoreEngineError::Step { class, .. } => *class,
        CoreEngineError::SecretUnavailable(_) => ErrorClass::Retryable,
        CoreEngineError::InvalidRunId(_) | CoreEngineError::InvalidParams(_) => ErrorClass::Configuration,
        _ => ErrorClass::Fatal,
    }
}
