//! Forma de los grafos compilados.

mod test_support;

use churn_adapters::{GraphKind, PipelineSettings};
use churn_storage::InMemoryObjectStore;
use serde_json::json;
use test_support::provider;

fn describe(kind: GraphKind) -> serde_json::Value {
    let store = InMemoryObjectStore::new();
    kind.build(&PipelineSettings::default(), provider(&store))
        .unwrap()
        .describe()
}

#[test]
fn every_graph_builds_with_the_same_secret_on_every_node() {
    for kind in GraphKind::ALL {
        let graph = describe(kind);
        assert_eq!(graph["name"], kind.name());
        assert_eq!(graph["secret"]["secret_name"], "minio-connection");
        let nodes = graph["nodes"].as_array().unwrap();
        assert!(!nodes.is_empty());
        for node in nodes {
            assert_eq!(node["secret"], "minio-connection", "node {} has no secret", node["id"]);
        }
    }
}

#[test]
fn secret_maps_both_keys_to_env() {
    let graph = describe(GraphKind::TrainAndSave);
    assert_eq!(graph["secret"]["key_to_env"],
               json!({"AWS_ACCESS_KEY_ID": "AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY": "AWS_SECRET_ACCESS_KEY"}));
}

#[test]
fn model_prefix_keeps_the_run_placeholder() {
    let graph = describe(GraphKind::TrainAndSave);
    let persist = &graph["nodes"][1];
    assert_eq!(persist["id"], "save_model");
    assert_eq!(persist["params"]["model_prefix"], "churn/baseline/{{$.pipeline_job_name}}");
    assert_eq!(persist["params"]["models_bucket"], "models");
}

#[test]
fn trainer_consumes_the_validator_output() {
    let graph = describe(GraphKind::ValidateTrainSave);
    assert_eq!(graph["edges"],
               json!([
                   {"from": "ingest_validate", "to": "train_baseline", "artifact": "ValidatedDataset"},
                   {"from": "train_baseline", "to": "save_model", "artifact": "TrainedBundle"}
               ]));
    assert_eq!(graph["nodes"][1]["input"], "ValidatedDataset");
    assert!(graph["nodes"][1]["params"].get("source").is_none());
}

#[test]
fn standalone_trainer_is_a_source_with_its_own_dataset() {
    let graph = describe(GraphKind::TrainOnly);
    let train = &graph["nodes"][0];
    assert_eq!(train["kind"], "Source");
    assert!(train["input"].is_null());
    assert_eq!(train["params"]["source"]["bucket"], "dataset");
    assert_eq!(train["params"]["source"]["key"], "churn/v1/raw/train.csv");
    assert_eq!(train["params"]["seed"], 42);
}

#[test]
fn validate_params_carry_defaults() {
    let graph = describe(GraphKind::ValidateOnly);
    let params = &graph["nodes"][0]["params"];
    assert_eq!(params["min_rows"], 100);
    assert_eq!(params["label_column"], "Churn");
    assert_eq!(params["s3_endpoint"], "http://minio.minio.svc.cluster.local:9000");
}

#[test]
fn graph_names_parse_back() {
    for kind in GraphKind::ALL {
        assert_eq!(kind.name().parse::<GraphKind>().unwrap(), kind);
    }
    assert!("churn-step99".parse::<GraphKind>().is_err());
}

#[test]
fn compiled_graph_never_contains_credentials() {
    let graph = describe(GraphKind::ValidateTrainSave).to_string();
    assert!(!graph.contains("minio-secret"));
}

#[test]
fn definition_hash_is_stable_across_builds() {
    assert_eq!(describe(GraphKind::TrainAndSave)["definition_hash"],
               describe(GraphKind::TrainAndSave)["definition_hash"]);
    assert_ne!(describe(GraphKind::TrainAndSave)["definition_hash"],
               describe(GraphKind::TrainOnly)["definition_hash"]);
}
