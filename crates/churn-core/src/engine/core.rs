//! Core FlowEngine implementation

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use log::{debug, error, info};
use serde_json::json;
use uuid::Uuid;

use crate::constants::ENGINE_VERSION;
use crate::errors::CoreEngineError;
use crate::event::{EventStore, FlowEvent, FlowEventKind, InMemoryEventStore};
use crate::hashing::hash_value;
use crate::injection::{CompositeInjector, ParamInjector, RunIdInjector, SecretResolver, StaticSecretResolver};
use crate::model::{Artifact, ArtifactSpec, ExecutionContext, StepFingerprintInput, StepRuntime};
use crate::repo::{FlowDefinition, FlowRepository, InMemoryFlowRepository};
use crate::step::{StepDefinition, StepRunResult};

/// Resultado de una ejecución completa.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub flow_id: Uuid,
    pub run_id: String,
    pub flow_fingerprint: String,
    /// (step_id, artifact) en orden de ejecución.
    pub step_outputs: Vec<(String, Artifact)>,
}

impl RunOutcome {
    /// Decodifica el output de `step_id` como artifact tipado.
    pub fn output_of<T: ArtifactSpec>(&self, step_id: &str) -> Result<T, CoreEngineError> {
        let (_, art) = self.step_outputs
                           .iter()
                           .find(|(id, _)| id == step_id)
                           .ok_or_else(|| CoreEngineError::Internal(format!("no output recorded for step '{step_id}'")))?;
        Ok(T::from_artifact(art)?)
    }
}

/// Un run id nombra un único directorio bajo el workspace y el último
/// segmento del prefijo del modelo: no vacío, un solo segmento normal y sin
/// placeholders sin resolver.
pub fn validate_run_id(run_id: &str) -> Result<(), CoreEngineError> {
    let invalid = |why: &str| -> Result<(), CoreEngineError> { Err(CoreEngineError::InvalidRunId(format!("{run_id:?}: {why}"))) };
    if run_id.trim().is_empty() {
        return invalid("must not be blank");
    }
    if run_id.contains("{{") {
        return invalid("contains an unresolved placeholder");
    }
    if run_id.contains(['/', '\\']) {
        return invalid("must be a single path segment");
    }
    let mut components = Path::new(run_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => invalid("must be a single path segment"),
    }
}

/// Motor de ejecución de grafos deterministas.
///
/// Ejecuta cada nodo exactamente una vez en orden topológico, sin reintentos
/// ni ramas: el primer fallo detiene el flujo. Antes de cada nodo que
/// requiere storage resuelve la credencial del `SecretBinding` de la
/// definición; después aplica los inyectores (por defecto `RunIdInjector`).
pub struct FlowEngine<E, R>
    where E: EventStore,
          R: FlowRepository
{
    event_store: E,
    repository: R,
    artifact_store: HashMap<String, Artifact>,
    injectors: Vec<Box<dyn ParamInjector>>,
    secret_resolver: Box<dyn SecretResolver>,
    workspace: PathBuf,
}

impl FlowEngine<InMemoryEventStore, InMemoryFlowRepository> {
    /// Engine con stores en memoria.
    pub fn in_memory() -> Self {
        Self::new_with_stores(InMemoryEventStore::default(), InMemoryFlowRepository::new())
    }
}

impl Default for FlowEngine<InMemoryEventStore, InMemoryFlowRepository> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<E, R> FlowEngine<E, R>
    where E: EventStore,
          R: FlowRepository
{
    pub fn new_with_stores(event_store: E, repository: R) -> Self {
        Self { event_store,
               repository,
               artifact_store: HashMap::new(),
               injectors: vec![Box::new(RunIdInjector)],
               secret_resolver: Box::new(StaticSecretResolver::default()),
               workspace: std::env::temp_dir().join("churnflow") }
    }

    pub fn with_secret_resolver(mut self, resolver: Box<dyn SecretResolver>) -> Self {
        self.secret_resolver = resolver;
        self
    }

    /// Raíz local donde cada step recibe `<workspace>/<run_id>/<step_id>`.
    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = workspace.into();
        self
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn events_for(&self, flow_id: Uuid) -> Vec<FlowEvent> {
        self.event_store.list(flow_id)
    }

    /// Ejecuta `definition` de principio a fin bajo `run_id`. Un run id
    /// inválido se rechaza antes de crear directorios o ejecutar steps.
    pub fn run(&mut self, definition: &FlowDefinition, run_id: &str) -> Result<RunOutcome, CoreEngineError> {
        validate_run_id(run_id)?;
        let flow_id = Uuid::new_v4();
        info!("flow '{}' started (run_id={}, flow_id={})", definition.name, run_id, flow_id);
        loop {
            match self.next_with(flow_id, definition, run_id) {
                Ok(()) => continue,
                Err(CoreEngineError::FlowCompleted) => break,
                Err(e) => {
                    error!("flow '{}' stopped (run_id={}): {}", definition.name, run_id, e);
                    return Err(e);
                }
            }
        }
        let outcome = self.outcome(flow_id, definition, run_id)?;
        info!("flow '{}' completed (run_id={}, fingerprint={})", definition.name, run_id, outcome.flow_fingerprint);
        Ok(outcome)
    }

    fn outcome(&self, flow_id: Uuid, definition: &FlowDefinition, run_id: &str) -> Result<RunOutcome, CoreEngineError> {
        let events = self.event_store.list(flow_id);
        let mut step_outputs = Vec::new();
        let mut flow_fingerprint = None;
        for ev in &events {
            match &ev.kind {
                FlowEventKind::StepFinished { step_id, outputs, .. } => {
                    for h in outputs {
                        if let Some(a) = self.artifact_store.get(h) {
                            step_outputs.push((step_id.clone(), a.clone()));
                        }
                    }
                }
                FlowEventKind::FlowCompleted { flow_fingerprint: fp } => flow_fingerprint = Some(fp.clone()),
                _ => {}
            }
        }
        let flow_fingerprint =
            flow_fingerprint.ok_or_else(|| CoreEngineError::Internal(format!("flow '{}' did not complete", definition.name)))?;
        Ok(RunOutcome { flow_id,
                        run_id: run_id.to_string(),
                        flow_fingerprint,
                        step_outputs })
    }

    /// Asegura que exista `FlowInitialized` y devuelve los eventos del flujo.
    fn load_or_init(&mut self, flow_id: Uuid, definition: &FlowDefinition, run_id: &str) -> Vec<FlowEvent> {
        let mut events = self.event_store.list(flow_id);
        if !events.iter().any(|e| matches!(e.kind, FlowEventKind::FlowInitialized { .. })) {
            let ev = self.event_store
                         .append_kind(flow_id,
                                      FlowEventKind::FlowInitialized { definition_hash: definition.definition_hash.clone(),
                                                                       step_count: definition.len(),
                                                                       run_id: run_id.to_string() });
            events.push(ev);
        }
        events
    }

    /// Ejecuta el siguiente step pendiente.
    pub(crate) fn next_with(&mut self, flow_id: Uuid, definition: &FlowDefinition, run_id: &str) -> Result<(), CoreEngineError> {
        let events = self.load_or_init(flow_id, definition, run_id);
        let instance = self.repository.load(flow_id, &events, definition);

        if instance.failed {
            return Err(CoreEngineError::FlowHasFailed);
        }
        if instance.completed || instance.cursor >= definition.len() {
            return Err(CoreEngineError::FlowCompleted);
        }

        let cursor = instance.cursor;
        let step_def = definition.steps[cursor].as_ref();
        let input_hashes: Vec<String> = if cursor == 0 {
            vec![]
        } else {
            instance.steps
                    .get(cursor - 1)
                    .map(|s| s.outputs.clone())
                    .unwrap_or_default()
        };
        let input = input_hashes.first().and_then(|h| self.artifact_store.get(h).cloned());

        self.event_store.append_kind(flow_id,
                                     FlowEventKind::StepStarted { step_index: cursor,
                                                                  step_id: step_def.id().to_string() });
        info!("step '{}' started (run_id={})", step_def.id(), run_id);

        let runtime = match self.prepare_runtime(definition, cursor, run_id) {
            Ok(rt) => rt,
            Err(e) => return self.handle_step_failure(flow_id, cursor, step_def, &input_hashes, e, definition),
        };

        let base = step_def.base_params();
        let mut ctx = ExecutionContext { input,
                                         params: base.clone(),
                                         runtime };
        ctx.params = CompositeInjector::apply_injectors(&self.injectors, &base, &ctx);

        match step_def.run(&ctx) {
            StepRunResult::Success { outputs } => {
                self.handle_step_success(flow_id, cursor, step_def, &input_hashes, outputs, definition)
            }
            StepRunResult::Failure { error } => {
                self.handle_step_failure(flow_id, cursor, step_def, &input_hashes, error, definition)
            }
        }
    }

    fn prepare_runtime(&self, definition: &FlowDefinition, cursor: usize, run_id: &str) -> Result<StepRuntime, CoreEngineError> {
        let step_def = &definition.steps[cursor];
        let output_dir = self.workspace.join(run_id).join(step_def.id());
        std::fs::create_dir_all(&output_dir).map_err(|e| {
                                                CoreEngineError::Internal(format!("cannot create {}: {e}", output_dir.display()))
                                            })?;
        let mut runtime = StepRuntime::new(run_id, output_dir);
        if step_def.requires_storage() {
            let binding = definition.secret_for(cursor)
                                    .ok_or_else(|| CoreEngineError::MissingSecretBinding(vec![step_def.id().to_string()]))?;
            debug!("injecting secret '{}' into step '{}'", binding.secret_name, step_def.id());
            runtime = runtime.with_credential(binding.resolve(self.secret_resolver.as_ref())?);
        }
        Ok(runtime)
    }

    fn handle_step_success(&mut self,
                           flow_id: Uuid,
                           cursor: usize,
                           step_def: &dyn StepDefinition,
                           input_hashes: &[String],
                           mut outputs: Vec<Artifact>,
                           definition: &FlowDefinition)
                           -> Result<(), CoreEngineError> {
        let mut output_hashes = Vec::with_capacity(outputs.len());
        for o in outputs.iter_mut() {
            o.hash = hash_value(&o.payload);
            output_hashes.push(o.hash.clone());
            self.artifact_store.insert(o.hash.clone(), o.clone());
        }
        let fp = self.calculate_step_fingerprint(cursor, step_def, input_hashes, &output_hashes, definition);

        self.event_store.append_kind(flow_id,
                                     FlowEventKind::StepFinished { step_index: cursor,
                                                                   step_id: step_def.id().to_string(),
                                                                   outputs: output_hashes,
                                                                   fingerprint: fp });
        info!("step '{}' finished", step_def.id());

        if cursor + 1 == definition.len() {
            self.complete_flow(flow_id, definition);
        }
        Ok(())
    }

    fn handle_step_failure(&mut self,
                           flow_id: Uuid,
                           cursor: usize,
                           step_def: &dyn StepDefinition,
                           input_hashes: &[String],
                           error: CoreEngineError,
                           definition: &FlowDefinition)
                           -> Result<(), CoreEngineError> {
        let fp = self.calculate_step_fingerprint(cursor, step_def, input_hashes, &[], definition);
        self.event_store.append_kind(flow_id,
                                     FlowEventKind::StepFailed { step_index: cursor,
                                                                 step_id: step_def.id().to_string(),
                                                                 error: error.clone(),
                                                                 fingerprint: fp });
        error!("step '{}' failed ({:?}): {}", step_def.id(), error.class(), error);
        Err(error)
    }

    fn calculate_step_fingerprint(&self,
                                  cursor: usize,
                                  step_def: &dyn StepDefinition,
                                  input_hashes: &[String],
                                  output_hashes: &[String],
                                  definition: &FlowDefinition)
                                  -> String {
        let params = step_def.base_params();
        let input = StepFingerprintInput { engine_version: ENGINE_VERSION,
                                           step_id: step_def.id(),
                                           step_index: cursor,
                                           input_hashes,
                                           output_hashes,
                                           params: &params,
                                           definition_hash: &definition.definition_hash };
        hash_value(&serde_json::to_value(&input).unwrap_or_default())
    }

    fn complete_flow(&mut self, flow_id: Uuid, definition: &FlowDefinition) {
        let step_fps: Vec<String> = self.event_store
                                        .list(flow_id)
                                        .iter()
                                        .filter_map(|e| match &e.kind {
                                            FlowEventKind::StepFinished { fingerprint, .. } => Some(fingerprint.clone()),
                                            _ => None,
                                        })
                                        .collect();
        let flow_fp = hash_value(&json!({
                                     "engine_version": ENGINE_VERSION,
                                     "definition_hash": definition.definition_hash,
                                     "step_fingerprints": step_fps
                                 }));
        self.event_store
            .append_kind(flow_id, FlowEventKind::FlowCompleted { flow_fingerprint: flow_fp });
    }
}
