//! Grafos del pipeline de churn.
//!
//! Todos se arman con las mismas definiciones de step y el mismo
//! `SecretBinding`, que `Pipe::build` exige para cualquier nodo con storage.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use churn_core::constants::RUN_ID_PLACEHOLDER;
use churn_core::{CoreEngineError, FlowDefinition, Pipe, SecretBinding};
use churn_storage::ObjectStoreProvider;

use crate::steps::{DatasetParams, PersistParams, PersistStep, TrainStep, ValidateParams, ValidateStep, DEFAULT_S3_ENDPOINT};

/// Configuración explícita de los grafos. Los steps no leen el entorno.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub s3_endpoint: String,
    pub dataset_bucket: String,
    pub dataset_key: String,
    pub label_column: String,
    pub min_rows: usize,
    pub models_bucket: String,
    pub model_domain: String,
    pub model_variant: String,
    pub secret_name: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { s3_endpoint: DEFAULT_S3_ENDPOINT.to_string(),
               dataset_bucket: "dataset".to_string(),
               dataset_key: "churn/v1/raw/train.csv".to_string(),
               label_column: "Churn".to_string(),
               min_rows: 100,
               models_bucket: "models".to_string(),
               model_domain: "churn".to_string(),
               model_variant: "baseline".to_string(),
               secret_name: "minio-connection".to_string() }
    }
}

impl PipelineSettings {
    pub fn dataset_params(&self) -> DatasetParams {
        DatasetParams { s3_endpoint: self.s3_endpoint.clone(),
                        bucket: self.dataset_bucket.clone(),
                        key: self.dataset_key.clone(),
                        label_column: self.label_column.clone() }
    }

    pub fn validate_params(&self) -> ValidateParams {
        ValidateParams { dataset: self.dataset_params(),
                         min_rows: self.min_rows }
    }

    /// `domain/variant/{{$.pipeline_job_name}}`; el run id se resuelve al
    /// ejecutar, nunca aquí.
    pub fn model_prefix_template(&self) -> String {
        format!("{}/{}/{}", self.model_domain, self.model_variant, RUN_ID_PLACEHOLDER)
    }

    pub fn persist_params(&self) -> PersistParams {
        PersistParams { s3_endpoint: self.s3_endpoint.clone(),
                        models_bucket: self.models_bucket.clone(),
                        model_prefix: self.model_prefix_template() }
    }

    pub fn secret(&self) -> SecretBinding {
        SecretBinding::s3(self.secret_name.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    ValidateOnly,
    TrainOnly,
    TrainAndSave,
    ValidateTrainSave,
}

impl GraphKind {
    pub const ALL: [GraphKind; 4] = [Self::ValidateOnly, Self::TrainOnly, Self::TrainAndSave, Self::ValidateTrainSave];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ValidateOnly => "churn-validate-only",
            Self::TrainOnly => "churn-train-baseline",
            Self::TrainAndSave => "churn-train-and-save",
            Self::ValidateTrainSave => "churn-validate-train-save",
        }
    }

    pub fn build(&self,
                 settings: &PipelineSettings,
                 provider: Arc<dyn ObjectStoreProvider>)
                 -> Result<FlowDefinition, CoreEngineError> {
        match self {
            Self::ValidateOnly => validate_only(settings, provider),
            Self::TrainOnly => train_baseline(settings, provider),
            Self::TrainAndSave => train_and_save(settings, provider),
            Self::ValidateTrainSave => validate_train_save(settings, provider),
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GraphKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
                 .find(|g| g.name() == s)
                 .ok_or_else(|| {
                     let known: Vec<&str> = Self::ALL.iter().map(GraphKind::name).collect();
                     format!("unknown graph '{s}' (known: {})", known.join(", "))
                 })
    }
}

pub fn validate_only(settings: &PipelineSettings, provider: Arc<dyn ObjectStoreProvider>) -> Result<FlowDefinition, CoreEngineError> {
    let validate = ValidateStep::new(settings.validate_params(), provider);
    Pipe::named(GraphKind::ValidateOnly.name(), validate).use_secret(settings.secret())
                                                         .build()
}

pub fn train_baseline(settings: &PipelineSettings, provider: Arc<dyn ObjectStoreProvider>) -> Result<FlowDefinition, CoreEngineError> {
    let train = TrainStep::standalone(settings.dataset_params(), provider);
    Pipe::named(GraphKind::TrainOnly.name(), train).use_secret(settings.secret())
                                                   .build()
}

pub fn train_and_save(settings: &PipelineSettings, provider: Arc<dyn ObjectStoreProvider>) -> Result<FlowDefinition, CoreEngineError> {
    let train = TrainStep::standalone(settings.dataset_params(), Arc::clone(&provider));
    let persist = PersistStep::new(settings.persist_params(), provider);
    Pipe::named(GraphKind::TrainAndSave.name(), train).then(persist)
                                                      .use_secret(settings.secret())
                                                      .build()
}

/// Validator → Trainer → Persister. El Trainer consume el `ValidatedDataset`
/// del Validator, así no puede correr antes que él.
pub fn validate_train_save(settings: &PipelineSettings,
                           provider: Arc<dyn ObjectStoreProvider>)
                           -> Result<FlowDefinition, CoreEngineError> {
    let validate = ValidateStep::new(settings.validate_params(), Arc::clone(&provider));
    let train = TrainStep::after_validation(Arc::clone(&provider));
    let persist = PersistStep::new(settings.persist_params(), provider);
    Pipe::named(GraphKind::ValidateTrainSave.name(), validate).then(train)
                                                              .then(persist)
                                                              .use_secret(settings.secret())
                                                              .build()
}
