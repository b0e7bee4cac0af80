use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const MODEL_OBJECT: &str = "model.json";
pub const PREPROCESSOR_OBJECT: &str = "preprocessor.json";
pub const METRICS_OBJECT: &str = "metrics.json";

/// Identifica exactamente un CSV en el object storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetRef {
    pub endpoint: String,
    pub bucket: String,
    pub key: String,
}

impl DatasetRef {
    pub fn new(endpoint: &str, bucket: &str, key: &str) -> Result<Self, DomainError> {
        if bucket.trim().is_empty() || key.trim().is_empty() {
            return Err(DomainError::Configuration("dataset bucket and key must not be empty".into()));
        }
        Ok(Self { endpoint: endpoint.to_string(),
                  bucket: bucket.to_string(),
                  key: key.trim_start_matches('/').to_string() })
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Prefijo versionado `{domain}/{variant}/{run_id}` bajo el que se escriben
/// los objetos de un bundle. Es el único aislamiento entre ejecuciones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelPrefix {
    domain: String,
    variant: String,
    run_id: String,
}

impl ModelPrefix {
    pub fn new(domain: &str, variant: &str, run_id: &str) -> Result<Self, DomainError> {
        for (what, seg) in [("domain", domain), ("variant", variant), ("run id", run_id)] {
            if seg.trim().is_empty() || seg.contains('/') {
                return Err(DomainError::Configuration(format!("invalid model prefix {what}: {seg:?}")));
            }
            if seg.contains("{{") {
                return Err(DomainError::Configuration(format!("unresolved placeholder in model prefix {what}: {seg}")));
            }
        }
        Ok(Self { domain: domain.to_string(),
                  variant: variant.to_string(),
                  run_id: run_id.to_string() })
    }

    /// Parsea `domain/variant/run_id`.
    pub fn parse(prefix: &str) -> Result<Self, DomainError> {
        let parts: Vec<&str> = prefix.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            [domain, variant, run_id] => Self::new(domain, variant, run_id),
            _ => Err(DomainError::Configuration(format!("model prefix must be domain/variant/run_id, got {prefix:?}"))),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn object_key(&self, name: &str) -> String {
        format!("{self}/{name}")
    }

    pub fn model_key(&self) -> String {
        self.object_key(MODEL_OBJECT)
    }

    pub fn preprocessor_key(&self) -> String {
        self.object_key(PREPROCESSOR_OBJECT)
    }

    pub fn metrics_key(&self) -> String {
        self.object_key(METRICS_OBJECT)
    }
}

impl fmt::Display for ModelPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.domain, self.variant, self.run_id)
    }
}
