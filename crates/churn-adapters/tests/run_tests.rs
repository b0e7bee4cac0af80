//! Ejecución de los grafos sobre el motor en memoria.

mod test_support;

use churn_adapters::{GraphKind, PersistedBundle, PipelineSettings, TrainedBundle, ValidatedDataset};
use churn_core::{CoreEngineError, ErrorClass, FlowEngine, StaticSecretResolver};
use churn_storage::ObjectStore;
use serde_json::Value;
use test_support::{engine, provider, scratch, seeded_store};

#[test]
fn validate_only_writes_both_reports() {
    let store = seeded_store(500, 1);
    let def = GraphKind::ValidateOnly.build(&PipelineSettings::default(), provider(&store))
                                     .unwrap();
    let mut engine = engine();
    let outcome = engine.run(&def, "run-v1").unwrap();

    let validated: ValidatedDataset = outcome.output_of("ingest_validate").unwrap();
    assert_eq!(validated.rows, 500);
    assert_eq!(validated.label_column, "Churn");
    assert_eq!(validated.schema_report.path, "ingest_validate/schema.json");

    let run_dir = engine.workspace().join("run-v1");
    let schema: Value = serde_json::from_slice(&std::fs::read(run_dir.join(&validated.schema_report.path)).unwrap()).unwrap();
    assert_eq!(schema["rows"], 500);
    assert_eq!(schema["columns"].as_object().unwrap().len(), 21);
    let profile: Value = serde_json::from_slice(&std::fs::read(run_dir.join(&validated.profile_report.path)).unwrap()).unwrap();
    assert_eq!(profile["duplicate_rows"], 0);
    assert!(profile["label_distribution"]["Yes"].as_u64().unwrap() > 0);
}

#[test]
fn too_small_dataset_fails_validation_without_reports() {
    let store = seeded_store(50, 1);
    let def = GraphKind::ValidateOnly.build(&PipelineSettings::default(), provider(&store))
                                     .unwrap();
    let mut engine = engine();
    let err = engine.run(&def, "run-small").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Validation);
    assert!(matches!(&err, CoreEngineError::Step { code, .. } if code == "contract_violation.too_few_rows"));
    assert!(!engine.workspace().join("run-small/ingest_validate/schema.json").exists());
}

#[test]
fn train_and_save_publishes_three_objects_under_the_run_prefix() {
    let store = seeded_store(500, 2);
    let def = GraphKind::TrainAndSave.build(&PipelineSettings::default(), provider(&store))
                                     .unwrap();
    let mut engine = engine();
    let outcome = engine.run(&def, "run42").unwrap();

    let persisted: PersistedBundle = outcome.output_of("save_model").unwrap();
    assert_eq!(persisted.prefix, "churn/baseline/run42");
    assert_eq!(store.list_objects("models", "churn/baseline/run42/").unwrap(),
               vec!["churn/baseline/run42/metrics.json".to_string(),
                    "churn/baseline/run42/model.json".to_string(),
                    "churn/baseline/run42/preprocessor.json".to_string()]);

    let trained: TrainedBundle = outcome.output_of("train_baseline").unwrap();
    let run_dir = engine.workspace().join("run42");
    assert_eq!(store.get_object("models", &persisted.model_key).unwrap(),
               std::fs::read(run_dir.join(&trained.model.path)).unwrap());
    assert_eq!(store.get_object("models", &persisted.preprocessor_key).unwrap(),
               std::fs::read(run_dir.join(&trained.preprocessor.path)).unwrap());

    let metrics = store.object("models", &persisted.metrics_key).unwrap();
    assert_eq!(metrics.content_type, "application/json");
    let metrics: Value = serde_json::from_slice(&metrics.body).unwrap();
    for field in ["accuracy", "roc_auc"] {
        let v = metrics[field].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&v), "{field} = {v}");
    }
}

#[test]
fn validate_train_save_runs_in_order() {
    let store = seeded_store(400, 3);
    let def = GraphKind::ValidateTrainSave.build(&PipelineSettings::default(), provider(&store))
                                          .unwrap();
    let mut engine = engine();
    let outcome = engine.run(&def, "run-chain").unwrap();
    let order: Vec<&str> = outcome.step_outputs.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, vec!["ingest_validate", "train_baseline", "save_model"]);
    assert_eq!(store.list_objects("models", "churn/baseline/run-chain/").unwrap().len(), 3);
}

#[test]
fn invalid_dataset_stops_before_training() {
    let store = seeded_store(50, 3);
    let def = GraphKind::ValidateTrainSave.build(&PipelineSettings::default(), provider(&store))
                                          .unwrap();
    let mut engine = engine();
    assert!(engine.run(&def, "run-stop").is_err());
    assert!(store.list_objects("models", "").unwrap().is_empty());
    assert!(!engine.workspace().join("run-stop/train_baseline").exists());
}

#[test]
fn same_data_same_training_fingerprint_across_run_ids() {
    let store = seeded_store(300, 4);
    let def = GraphKind::TrainOnly.build(&PipelineSettings::default(), provider(&store))
                                  .unwrap();
    let mut engine = engine();
    let a = engine.run(&def, "run-a").unwrap();
    let b = engine.run(&def, "run-b").unwrap();
    assert_eq!(a.flow_fingerprint, b.flow_fingerprint);
}

#[test]
fn reusing_a_run_id_overwrites_the_previous_bundle() {
    let store = seeded_store(300, 5);
    let def = GraphKind::TrainAndSave.build(&PipelineSettings::default(), provider(&store))
                                     .unwrap();
    let mut engine = engine();
    engine.run(&def, "dup").unwrap();
    engine.run(&def, "dup").unwrap();
    assert_eq!(store.list_objects("models", "churn/baseline/dup/").unwrap().len(), 3);
}

#[test]
fn unreachable_storage_is_retryable() {
    let store = seeded_store(300, 6);
    store.set_unreachable(true);
    let def = GraphKind::TrainOnly.build(&PipelineSettings::default(), provider(&store))
                                  .unwrap();
    let err = engine().run(&def, "run-down").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Retryable);
    assert!(matches!(&err, CoreEngineError::Step { code, .. } if code == "storage_unavailable"));
}

#[test]
fn missing_dataset_object_is_retryable() {
    let store = churn_storage::InMemoryObjectStore::new();
    let def = GraphKind::ValidateOnly.build(&PipelineSettings::default(), provider(&store))
                                     .unwrap();
    let err = engine().run(&def, "run-empty").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Retryable);
}

#[test]
fn unresolvable_secret_fails_before_touching_storage() {
    let store = seeded_store(300, 7);
    let def = GraphKind::TrainAndSave.build(&PipelineSettings::default(), provider(&store))
                                     .unwrap();
    let mut engine = FlowEngine::in_memory().with_secret_resolver(Box::new(StaticSecretResolver::default()))
                                            .with_workspace(scratch());
    let err = engine.run(&def, "run-nosecret").unwrap_err();
    assert!(matches!(err, CoreEngineError::SecretUnavailable(_)));
    assert_eq!(err.class(), ErrorClass::Retryable);
    assert!(store.list_objects("models", "").unwrap().is_empty());
}

#[test]
fn custom_prefix_segments_come_from_settings() {
    let store = seeded_store(300, 8);
    let settings = PipelineSettings { model_domain: "churn".into(),
                                      model_variant: "candidate".into(),
                                      models_bucket: "ml-models".into(),
                                      ..PipelineSettings::default() };
    let def = GraphKind::TrainAndSave.build(&settings, provider(&store)).unwrap();
    engine().run(&def, "r7").unwrap();
    assert_eq!(store.list_objects("ml-models", "churn/candidate/r7/").unwrap().len(), 3);
}
