//! Tipos de evento del flujo.
//!
//! Cada ejecución del `FlowEngine` emite eventos a un `EventStore`
//! append-only; el `FlowRepository` reconstruye el estado a partir de ellos.
//! Ningún evento lleva credenciales ni params inyectados.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreEngineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FlowEventKind {
    /// Primer evento de un `flow_id`: fija definición y run id.
    FlowInitialized {
        definition_hash: String,
        step_count: usize,
        run_id: String,
    },
    StepStarted { step_index: usize, step_id: String },
    StepFinished {
        step_index: usize,
        step_id: String,
        outputs: Vec<String>,
        fingerprint: String,
    },
    /// Error terminal; el flujo no continúa (stop-on-failure).
    StepFailed {
        step_index: usize,
        step_id: String,
        error: CoreEngineError,
        fingerprint: String,
    },
    /// Cierre con fingerprint agregado de los steps.
    FlowCompleted { flow_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEvent {
    pub seq: u64,
    pub flow_id: Uuid,
    pub kind: FlowEventKind,
    pub ts: DateTime<Utc>, // no entra en fingerprint
}
