//! Validación de definiciones al construir el grafo.

use churn_core::model::{ArtifactKind, StepRuntime};
use churn_core::{build_flow_definition, CoreEngineError, Pipe, SecretBinding, StepDefinition, StepKind, StepRunResultTyped,
                 TypedStep};

churn_core::typed_artifact!(Blob { n: u32 } kind: ArtifactKind::GenericJson);

#[derive(Debug)]
struct Fixed {
    id: &'static str,
    kind: StepKind,
    storage: bool,
}

impl TypedStep for Fixed {
    type Params = ();
    type Input = Blob;
    type Output = Blob;
    fn id(&self) -> &'static str {
        self.id
    }
    fn kind(&self) -> StepKind {
        self.kind
    }
    fn requires_storage(&self) -> bool {
        self.storage
    }
    fn run_typed(&self, _i: Option<Blob>, _p: (), _rt: &StepRuntime) -> StepRunResultTyped<Blob> {
        StepRunResultTyped::Success { outputs: vec![Blob { n: 1, schema_version: 1 }] }
    }
}

fn src(storage: bool) -> Fixed {
    Fixed { id: "src", kind: StepKind::Source, storage }
}

fn sink(id: &'static str, storage: bool) -> Fixed {
    Fixed { id, kind: StepKind::Sink, storage }
}

#[test]
fn storage_steps_without_binding_are_rejected() {
    let err = Pipe::new(src(true)).then(sink("put", true)).build().unwrap_err();
    assert_eq!(err, CoreEngineError::MissingSecretBinding(vec!["src".into(), "put".into()]));
}

#[test]
fn binding_is_shared_by_every_storage_node() {
    let def = Pipe::named("g", src(true)).then(sink("local", false))
                                         .then(sink("put", true))
                                         .use_secret(SecretBinding::s3("minio-connection"))
                                         .build()
                                         .unwrap();
    assert_eq!(def.secret_for(0), def.secret_for(2));
    assert!(def.secret_for(0).is_some());
    assert!(def.secret_for(1).is_none());

    let described = def.describe();
    assert_eq!(described["name"], "g");
    assert_eq!(described["nodes"][2]["secret"], "minio-connection");
    assert_eq!(described["nodes"][1]["input"], "Blob");
    assert_eq!(described["edges"].as_array().map(Vec::len), Some(2));
}

#[test]
fn first_step_must_be_source_and_ids_unique() {
    let steps: Vec<Box<dyn StepDefinition>> = vec![Box::new(sink("a", false))];
    assert_eq!(build_flow_definition("x", steps, None).unwrap_err(), CoreEngineError::FirstStepMustBeSource);

    let steps: Vec<Box<dyn StepDefinition>> = vec![Box::new(src(false)), Box::new(sink("src", false))];
    assert_eq!(build_flow_definition("x", steps, None).unwrap_err(), CoreEngineError::DuplicateStepId("src".into()));

    assert_eq!(build_flow_definition("x", vec![], None).unwrap_err(), CoreEngineError::EmptyDefinition);
}

#[test]
fn definition_hash_depends_on_name_and_secret() {
    let a = Pipe::named("g", src(false)).build().unwrap();
    let b = Pipe::named("h", src(false)).build().unwrap();
    let c = Pipe::named("g", src(false)).use_secret(SecretBinding::s3("s")).build().unwrap();
    let a2 = Pipe::named("g", src(false)).build().unwrap();
    assert_eq!(a.definition_hash, a2.definition_hash);
    assert_ne!(a.definition_hash, b.definition_hash);
    assert_ne!(a.definition_hash, c.definition_hash);
}
