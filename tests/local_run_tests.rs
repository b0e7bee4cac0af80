//! Ejecución local completa sobre el object store de filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use churn_core::model::{AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY};
use churn_core::{ErrorClass, FlowEngine, StaticSecretResolver};
use churn_domain::synthetic_churn_csv;
use churn_storage::{FsObjectStore, ObjectStore, ObjectStoreProvider};
use churnflow::{exit_code, AppConfig, GraphKind};
use uuid::Uuid;

fn scratch() -> PathBuf {
    std::env::temp_dir().join(format!("churnflow-{}", Uuid::new_v4()))
}

fn local_config(root: &Path) -> AppConfig {
    let mut config = AppConfig::from_lookup(|_| None).unwrap();
    config.storage.root = root.join("object-store");
    config.workspace = root.join("workspace");
    config
}

fn engine(config: &AppConfig) -> FlowEngine<churn_core::InMemoryEventStore, churn_core::InMemoryFlowRepository> {
    let resolver = StaticSecretResolver::default().with("minio-connection", AWS_ACCESS_KEY_ID, "minio")
                                                  .with("minio-connection", AWS_SECRET_ACCESS_KEY, "minio123");
    FlowEngine::in_memory().with_secret_resolver(Box::new(resolver))
                           .with_workspace(&config.workspace)
}

fn seed(config: &AppConfig, rows: usize) -> FsObjectStore {
    let store = FsObjectStore::new(&config.storage.root);
    store.put_object(&config.pipeline.dataset_bucket,
                     &config.pipeline.dataset_key,
                     &synthetic_churn_csv(rows, 42).unwrap(),
                     "text/csv")
         .unwrap();
    store
}

#[test]
fn validate_train_save_lands_on_disk() {
    let root = scratch();
    let config = local_config(&root);
    let store = seed(&config, 600);
    let provider: Arc<dyn ObjectStoreProvider> = Arc::new(store.clone());

    let def = GraphKind::ValidateTrainSave.build(&config.pipeline, provider).unwrap();
    engine(&config).run(&def, "run42").unwrap();

    for name in ["model.json", "preprocessor.json", "metrics.json"] {
        assert!(config.storage.root.join("models/churn/baseline/run42").join(name).is_file(), "{name}");
    }
    assert!(config.workspace.join("run42/ingest_validate/schema.json").is_file());
    assert!(config.workspace.join("run42/ingest_validate/data_profile.json").is_file());
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn contract_violation_maps_to_data_error_exit_code() {
    let root = scratch();
    let config = local_config(&root);
    let store = seed(&config, 40);
    let provider: Arc<dyn ObjectStoreProvider> = Arc::new(store);

    let def = GraphKind::ValidateOnly.build(&config.pipeline, provider).unwrap();
    let err = engine(&config).run(&def, "small").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Validation);
    assert_eq!(exit_code(err.class()), 65);
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn compiled_graphs_are_plain_json() {
    let root = scratch();
    let config = local_config(&root);
    let provider: Arc<dyn ObjectStoreProvider> = Arc::new(FsObjectStore::new(&config.storage.root));
    for kind in GraphKind::ALL {
        let described = kind.build(&config.pipeline, Arc::clone(&provider)).unwrap().describe();
        let text = serde_json::to_string_pretty(&described).unwrap();
        assert!(text.contains(kind.name()));
    }
    assert!(!config.storage.root.exists());
}

#[test]
fn path_like_run_id_is_a_usage_error_before_any_step() {
    let root = scratch();
    let config = local_config(&root);
    let store = seed(&config, 600);
    let provider: Arc<dyn ObjectStoreProvider> = Arc::new(store);

    let def = GraphKind::ValidateTrainSave.build(&config.pipeline, provider).unwrap();
    for bad in ["../escape", "nested/run"] {
        let err = engine(&config).run(&def, bad).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Configuration);
        assert_eq!(exit_code(err.class()), churnflow::EXIT_USAGE);
    }
    assert!(!config.workspace.exists());
    assert!(!root.join("escape").exists());
    assert!(!config.storage.root.join("models").exists());
    let _ = std::fs::remove_dir_all(root);
}
