//! Utilidades compartidas por los tests de integración de adapters.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use churn_core::model::{AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY};
use churn_core::{FlowEngine, InMemoryEventStore, InMemoryFlowRepository, StaticSecretResolver};
use churn_domain::synthetic_churn_csv;
use churn_storage::{InMemoryObjectStore, ObjectStore, ObjectStoreProvider};
use uuid::Uuid;

pub const DATASET_BUCKET: &str = "dataset";
pub const DATASET_KEY: &str = "churn/v1/raw/train.csv";

pub fn scratch() -> PathBuf {
    std::env::temp_dir().join(format!("churn-adapters-{}", Uuid::new_v4()))
}

/// Store en memoria con un CSV sintético en la ubicación por defecto.
pub fn seeded_store(rows: usize, seed: u64) -> InMemoryObjectStore {
    let store = InMemoryObjectStore::new();
    let csv = synthetic_churn_csv(rows, seed).expect("synthetic csv");
    store.put_object(DATASET_BUCKET, DATASET_KEY, &csv, "text/csv")
         .expect("seed dataset");
    store
}

pub fn provider(store: &InMemoryObjectStore) -> Arc<dyn ObjectStoreProvider> {
    Arc::new(store.clone())
}

pub fn resolver() -> StaticSecretResolver {
    StaticSecretResolver::default().with("minio-connection", AWS_ACCESS_KEY_ID, "minio")
                                   .with("minio-connection", AWS_SECRET_ACCESS_KEY, "minio-secret")
}

pub fn engine() -> FlowEngine<InMemoryEventStore, InMemoryFlowRepository> {
    FlowEngine::in_memory().with_secret_resolver(Box::new(resolver()))
                           .with_workspace(scratch())
}
