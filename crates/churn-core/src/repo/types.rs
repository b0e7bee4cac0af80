//! Tipos de repositorio: estado reconstruido (`FlowInstance`) y definición
//! (`FlowDefinition`).
//!
//! El repositorio aplica un replay lineal: consume eventos en orden y
//! reconstruye un `FlowInstance`. Sólo guarda hashes de outputs.
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::CoreEngineError;
use crate::event::{FlowEvent, FlowEventKind};
use crate::hashing::hash_value;
use crate::model::SecretBinding;
use crate::step::{StepDefinition, StepKind, StepStatus};

pub struct FlowInstance {
    pub id: Uuid,
    pub run_id: Option<String>,
    pub steps: Vec<StepSlot>,
    pub cursor: usize,
    pub completed: bool,
    pub failed: bool,
}

/// Estado de un step en la instancia.
pub struct StepSlot {
    pub step_id: String,
    pub status: StepStatus,
    pub fingerprint: Option<String>,
    pub outputs: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Reconstruye (`replay`) el estado de un flow a partir de eventos.
pub trait FlowRepository {
    fn load(&self, flow_id: Uuid, events: &[FlowEvent], definition: &FlowDefinition) -> FlowInstance;
}

/// Definición inmutable de un grafo: nodos en orden topológico (lineal), un
/// único binding de secreto compartido por los nodos que usan storage.
#[derive(Debug)]
pub struct FlowDefinition {
    pub name: String,
    pub steps: Vec<Box<dyn StepDefinition>>,
    pub definition_hash: String,
    pub secret: Option<SecretBinding>,
}

impl FlowDefinition {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Binding a inyectar en el step `index`; `None` si no usa storage.
    pub fn secret_for(&self, index: usize) -> Option<&SecretBinding> {
        let step = self.steps.get(index)?;
        if step.requires_storage() {
            self.secret.as_ref()
        } else {
            None
        }
    }

    /// Representación compilada del grafo. Los params aparecen sin inyectar,
    /// con el placeholder del run id intacto, y el secreto sólo por nombre.
    pub fn describe(&self) -> Value {
        let nodes: Vec<Value> = self.steps
                                    .iter()
                                    .enumerate()
                                    .map(|(i, s)| {
                                        json!({
                                            "id": s.id(),
                                            "kind": s.kind(),
                                            "input": s.input_type(),
                                            "output": s.output_type(),
                                            "params": s.base_params(),
                                            "secret": self.secret_for(i).map(|b| &b.secret_name),
                                        })
                                    })
                                    .collect();
        let edges: Vec<Value> = self.steps
                                    .windows(2)
                                    .map(|w| json!({ "from": w[0].id(), "to": w[1].id(), "artifact": w[0].output_type() }))
                                    .collect();
        json!({
            "name": self.name,
            "definition_hash": self.definition_hash,
            "nodes": nodes,
            "edges": edges,
            "secret": self.secret,
        })
    }
}

pub struct InMemoryFlowRepository;

impl InMemoryFlowRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InMemoryFlowRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowRepository for InMemoryFlowRepository {
    fn load(&self, flow_id: Uuid, events: &[FlowEvent], definition: &FlowDefinition) -> FlowInstance {
        let mut steps: Vec<StepSlot> = definition.steps
                                                 .iter()
                                                 .map(|s| StepSlot { step_id: s.id().to_string(),
                                                                     status: StepStatus::Pending,
                                                                     fingerprint: None,
                                                                     outputs: vec![],
                                                                     started_at: None,
                                                                     finished_at: None })
                                                 .collect();
        let mut run_id = None;
        let mut completed = false;
        for ev in events {
            match &ev.kind {
                FlowEventKind::FlowInitialized { run_id: r, .. } => run_id = Some(r.clone()),
                FlowEventKind::StepStarted { step_index, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Running;
                        slot.started_at = Some(ev.ts);
                    }
                }
                FlowEventKind::StepFinished { step_index,
                                              fingerprint,
                                              outputs,
                                              .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::FinishedOk;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.outputs = outputs.clone();
                        slot.finished_at = Some(ev.ts);
                    }
                }
                FlowEventKind::StepFailed { step_index, fingerprint, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                FlowEventKind::FlowCompleted { .. } => completed = true,
            }
        }
        let failed = steps.iter().any(|s| s.status == StepStatus::Failed);
        let cursor = steps.iter()
                          .position(|s| matches!(s.status, StepStatus::Pending))
                          .unwrap_or(steps.len());
        FlowInstance { id: flow_id,
                       run_id,
                       steps,
                       cursor,
                       completed,
                       failed }
    }
}

/// Valida y congela una definición: no vacía, primer step `Source`, ids
/// únicos y binding de secreto presente si algún step usa storage.
pub fn build_flow_definition(name: impl Into<String>,
                             steps: Vec<Box<dyn StepDefinition>>,
                             secret: Option<SecretBinding>)
                             -> Result<FlowDefinition, CoreEngineError> {
    let first = steps.first().ok_or(CoreEngineError::EmptyDefinition)?;
    if first.kind() != StepKind::Source {
        return Err(CoreEngineError::FirstStepMustBeSource);
    }
    let mut seen = HashSet::new();
    for s in &steps {
        if !seen.insert(s.id().to_string()) {
            return Err(CoreEngineError::DuplicateStepId(s.id().to_string()));
        }
    }
    if secret.is_none() {
        let unbound: Vec<String> = steps.iter()
                                        .filter(|s| s.requires_storage())
                                        .map(|s| s.id().to_string())
                                        .collect();
        if !unbound.is_empty() {
            return Err(CoreEngineError::MissingSecretBinding(unbound));
        }
    }

    let name = name.into();
    let step_hashes: Vec<Value> = steps.iter()
                                       .map(|s| json!({ "id": s.id(), "definition_hash": s.definition_hash() }))
                                       .collect();
    let definition_hash = hash_value(&json!({ "name": name, "steps": step_hashes, "secret": secret }));
    Ok(FlowDefinition { name,
                        steps,
                        definition_hash,
                        secret })
}
