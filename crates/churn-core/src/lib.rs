//! churn-core: motor determinista de grafos lineales con aristas tipadas.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod injection;
pub mod model;
pub mod repo;
pub mod step;

pub use engine::{validate_run_id, FlowEngine, RunOutcome};
pub use errors::{classify_error, CoreEngineError, ErrorClass};
pub use event::{EventStore, FlowEvent, FlowEventKind, InMemoryEventStore};
pub use injection::{CompositeInjector, ParamInjector, RunIdInjector, SecretResolver, StaticSecretResolver};
pub use model::{Artifact, ArtifactKind, ArtifactSpec, Credential, ExecutionContext, SecretBinding, StepRuntime};
pub use repo::{build_flow_definition, FlowDefinition, FlowRepository, InMemoryFlowRepository};
pub use step::{Pipe, SameAs, StepDefinition, StepKind, StepRunResult, StepRunResultTyped, StepStatus, TypedStep};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    typed_artifact!(JsonSpec { value: serde_json::Value });

    typed_step! {
        source SourceStep {
            id: "src",
            output: JsonSpec,
            params: (),
            run(_s, _p, _rt) {
                Ok(JsonSpec { value: json!("src"), schema_version: 1 })
            }
        }
    }

    typed_step! {
        step AStep {
            id: "a",
            kind: StepKind::Transform,
            input: JsonSpec,
            output: JsonSpec,
            params: (),
            run(_s, inp, _p, _rt) {
                Ok(JsonSpec { value: json!([inp.value, "a"]), schema_version: 1 })
            }
        }
    }

    typed_step! {
        step BrokenStep {
            id: "broken",
            kind: StepKind::Sink,
            input: JsonSpec,
            output: JsonSpec,
            params: (),
            run(_s, _inp, _p, _rt) {
                Err(CoreEngineError::Internal("boom".into()))
            }
        }
    }

    #[test]
    fn macro_steps_chain_through_typed_edges() {
        let def = Pipe::named("demo", SourceStep::new()).then(AStep::new()).build().unwrap();
        let mut engine = FlowEngine::in_memory().with_workspace(std::env::temp_dir().join("churn-core-lib-tests"));
        let outcome = engine.run(&def, "r").unwrap();
        let out: JsonSpec = outcome.output_of("a").unwrap();
        assert_eq!(out.value, json!(["src", "a"]));
    }

    #[test]
    fn replay_marks_failed_step_and_keeps_cursor() {
        let def = Pipe::new(SourceStep::new()).then(AStep::new()).then(BrokenStep::new()).build().unwrap();
        let mut engine = FlowEngine::in_memory().with_workspace(std::env::temp_dir().join("churn-core-lib-tests"));
        let err = engine.run(&def, "r").unwrap_err();
        assert_eq!(err, CoreEngineError::Internal("boom".into()));

        let flow_id = engine.event_store().inner.keys().next().copied().unwrap();
        let events = engine.events_for(flow_id);
        let inst = InMemoryFlowRepository::new().load(flow_id, &events, &def);
        assert!(inst.failed);
        assert!(!inst.completed);
        assert_eq!(inst.cursor, 3);
        assert_eq!(inst.steps[1].status, StepStatus::FinishedOk);
        assert_eq!(inst.steps[2].status, StepStatus::Failed);
        assert_eq!(inst.run_id.as_deref(), Some("r"));
    }
}
