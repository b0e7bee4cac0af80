//! Políticas de lectura y escritura del Persister.

mod test_support;

use churn_adapters::artifacts::FileHandle;
use churn_adapters::ops::{persist_bundle, read_metrics, ReadPolicy};
use churn_adapters::TrainedBundle;
use churn_core::model::StepRuntime;
use churn_domain::{DomainError, ModelPrefix};
use churn_storage::{InMemoryObjectStore, ObjectStore};
use serde_json::json;
use test_support::scratch;

/// Bundle escrito a mano en `<tmp>/run42/train_baseline`.
fn local_bundle() -> (StepRuntime, TrainedBundle) {
    let dir = scratch().join("run42").join("train_baseline");
    std::fs::create_dir_all(&dir).unwrap();
    let rt = StepRuntime::new("run42", dir);
    let bundle = TrainedBundle { model: FileHandle::write(&rt, "model.json", br#"{"classifier":"lr"}"#).unwrap(),
                                 preprocessor: FileHandle::write(&rt, "preprocessor.json", br#"{"scaler":[]}"#).unwrap(),
                                 metrics: FileHandle::write(&rt, "metrics.json", br#"{"accuracy":0.8,"roc_auc":0.85}"#).unwrap(),
                                 schema_version: 1 };
    (rt, bundle)
}

fn prefix() -> ModelPrefix {
    ModelPrefix::parse("churn/baseline/run42").unwrap()
}

#[test]
fn round_trip_is_byte_identical() {
    let (rt, bundle) = local_bundle();
    let store = InMemoryObjectStore::new();
    let out = persist_bundle(&store, "models", &prefix(), &bundle, &rt).unwrap();
    assert_eq!(out.model_key, "churn/baseline/run42/model.json");
    assert_eq!(store.get_object("models", &out.model_key).unwrap(), br#"{"classifier":"lr"}"#.to_vec());
    assert_eq!(store.get_object("models", &out.preprocessor_key).unwrap(), br#"{"scaler":[]}"#.to_vec());
    let metrics: serde_json::Value = serde_json::from_slice(&store.get_object("models", &out.metrics_key).unwrap()).unwrap();
    assert_eq!(metrics, json!({"accuracy": 0.8, "roc_auc": 0.85}));
}

#[test]
fn preprocessor_failure_after_model_is_partial() {
    let (rt, bundle) = local_bundle();
    let store = InMemoryObjectStore::new();
    store.fail_puts_ending_with("preprocessor.json");
    let err = persist_bundle(&store, "models", &prefix(), &bundle, &rt).unwrap_err();
    match err {
        DomainError::PersistPartialFailure { written, failed, .. } => {
            assert_eq!(written, vec!["churn/baseline/run42/model.json".to_string()]);
            assert_eq!(failed, "churn/baseline/run42/preprocessor.json");
        }
        other => panic!("unexpected error: {other}"),
    }
    // no rollback
    assert!(store.object("models", "churn/baseline/run42/model.json").is_some());
}

#[test]
fn first_upload_failure_is_storage_unavailable() {
    let (rt, bundle) = local_bundle();
    let store = InMemoryObjectStore::new();
    store.fail_puts_ending_with("model.json");
    let err = persist_bundle(&store, "models", &prefix(), &bundle, &rt).unwrap_err();
    assert!(matches!(err, DomainError::StorageUnavailable(_)));
    assert!(store.is_empty());
}

#[test]
fn missing_metrics_file_publishes_empty_mapping() {
    let (rt, bundle) = local_bundle();
    std::fs::remove_file(bundle.metrics.resolve(&rt)).unwrap();
    let store = InMemoryObjectStore::new();
    let out = persist_bundle(&store, "models", &prefix(), &bundle, &rt).unwrap();
    let metrics: serde_json::Value = serde_json::from_slice(&store.get_object("models", &out.metrics_key).unwrap()).unwrap();
    assert_eq!(metrics, json!({}));
}

#[test]
fn metrics_policies_differ_on_garbage() {
    let (rt, _) = local_bundle();
    let garbage = FileHandle::write(&rt, "metrics.json", b"not json").unwrap();
    assert_eq!(read_metrics(&garbage, &rt, ReadPolicy::Lenient).unwrap(), json!({}));
    assert!(read_metrics(&garbage, &rt, ReadPolicy::Strict).is_err());
}

#[test]
fn missing_model_file_aborts_before_any_upload() {
    let (rt, bundle) = local_bundle();
    std::fs::remove_file(bundle.model.resolve(&rt)).unwrap();
    let store = InMemoryObjectStore::new();
    let err = persist_bundle(&store, "models", &prefix(), &bundle, &rt).unwrap_err();
    assert_eq!(err.code(), "workspace_io");
    assert!(store.is_empty());
}

#[test]
fn tampered_preprocessor_is_rejected() {
    let (rt, bundle) = local_bundle();
    std::fs::write(bundle.preprocessor.resolve(&rt), b"{}").unwrap();
    let store = InMemoryObjectStore::new();
    assert!(persist_bundle(&store, "models", &prefix(), &bundle, &rt).is_err());
    assert!(store.is_empty());
}
