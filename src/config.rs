//! Configuración central de la aplicación.
//! Lee variables `CHURNFLOW_*` (con `.env` opcional) y arma la configuración
//! explícita que reciben los grafos y el motor.

use std::env;
use std::path::PathBuf;

use churn_adapters::PipelineSettings;
use churn_storage::{init_dotenv, StorageConfig};
use thiserror::Error;

pub const S3_ENDPOINT_ENV: &str = "CHURNFLOW_S3_ENDPOINT";
pub const DATASET_BUCKET_ENV: &str = "CHURNFLOW_DATASET_BUCKET";
pub const DATASET_KEY_ENV: &str = "CHURNFLOW_DATASET_KEY";
pub const LABEL_COLUMN_ENV: &str = "CHURNFLOW_LABEL_COLUMN";
pub const MIN_ROWS_ENV: &str = "CHURNFLOW_MIN_ROWS";
pub const MODELS_BUCKET_ENV: &str = "CHURNFLOW_MODELS_BUCKET";
pub const MODEL_DOMAIN_ENV: &str = "CHURNFLOW_MODEL_DOMAIN";
pub const MODEL_VARIANT_ENV: &str = "CHURNFLOW_MODEL_VARIANT";
pub const SECRET_NAME_ENV: &str = "CHURNFLOW_SECRET_NAME";
pub const WORKSPACE_ENV: &str = "CHURNFLOW_WORKSPACE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Lo que ven los grafos: endpoint, dataset, prefijo, secreto.
    pub pipeline: PipelineSettings,
    /// Raíz de los directorios locales por ejecución.
    pub workspace: PathBuf,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        init_dotenv();
        let mut config = Self::from_lookup(|name| env::var(name).ok())?;
        config.storage = StorageConfig::from_env();
        Ok(config)
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = PipelineSettings::default();
        let text = |var: &'static str, default: String| -> Result<String, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(v) if v.trim().is_empty() => Err(ConfigError::Empty(var)),
                Some(v) => Ok(v.trim().to_string()),
            }
        };
        let min_rows = match lookup(MIN_ROWS_ENV) {
            None => defaults.min_rows,
            Some(v) => v.trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidNumber { var: MIN_ROWS_ENV,
                                                                  value: v.clone() })?,
        };
        let pipeline = PipelineSettings { s3_endpoint: text(S3_ENDPOINT_ENV, defaults.s3_endpoint)?,
                                          dataset_bucket: text(DATASET_BUCKET_ENV, defaults.dataset_bucket)?,
                                          dataset_key: text(DATASET_KEY_ENV, defaults.dataset_key)?,
                                          label_column: text(LABEL_COLUMN_ENV, defaults.label_column)?,
                                          min_rows,
                                          models_bucket: text(MODELS_BUCKET_ENV, defaults.models_bucket)?,
                                          model_domain: text(MODEL_DOMAIN_ENV, defaults.model_domain)?,
                                          model_variant: text(MODEL_VARIANT_ENV, defaults.model_variant)?,
                                          secret_name: text(SECRET_NAME_ENV, defaults.secret_name)? };
        let workspace = lookup(WORKSPACE_ENV).filter(|v| !v.trim().is_empty())
                                             .map(PathBuf::from)
                                             .unwrap_or_else(|| env::temp_dir().join("churnflow"));
        Ok(Self { pipeline,
                  workspace,
                  storage: StorageConfig { root: PathBuf::from(churn_storage::config::DEFAULT_STORAGE_ROOT) } })
    }
}
