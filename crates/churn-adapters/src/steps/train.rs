//! TrainStep: entrena el baseline y deja `model.json`, `preprocessor.json` y
//! `metrics.json` en su directorio.
//!
//! Dos formas del mismo step:
//! - `standalone`: Source, el dataset sale de sus params.
//! - `after_validation`: Transform, el dataset y la columna label salen del
//!   `ValidatedDataset` del Validator. Esa arista tipada es la que ordena
//!   Validator → Trainer.

use std::sync::Arc;

use churn_core::model::StepRuntime;
use churn_core::step::{StepKind, StepRunResultTyped, TypedStep};
use churn_core::CoreEngineError;
use churn_domain::{DatasetRef, METRICS_OBJECT, MODEL_OBJECT, PREPROCESSOR_OBJECT};
use churn_learn::TrainConfig;
use churn_storage::ObjectStoreProvider;
use serde::{Deserialize, Serialize};

use super::{connect, pretty, DatasetParams};
use crate::artifacts::{FileHandle, TrainedBundle, ValidatedDataset};
use crate::error::step_error;
use crate::ops::train_from_store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    /// Sólo en modo standalone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DatasetParams>,
    pub test_size: f64,
    pub seed: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        let config = TrainConfig::default();
        Self { source: Some(DatasetParams::default()),
               test_size: config.test_size,
               seed: config.seed }
    }
}

#[derive(Debug, Clone)]
pub struct TrainStep {
    params: TrainParams,
    kind: StepKind,
    provider: Arc<dyn ObjectStoreProvider>,
}

impl TrainStep {
    pub fn standalone(dataset: DatasetParams, provider: Arc<dyn ObjectStoreProvider>) -> Self {
        Self { params: TrainParams { source: Some(dataset),
                                     ..TrainParams::default() },
               kind: StepKind::Source,
               provider }
    }

    pub fn after_validation(provider: Arc<dyn ObjectStoreProvider>) -> Self {
        Self { params: TrainParams { source: None,
                                     ..TrainParams::default() },
               kind: StepKind::Transform,
               provider }
    }

    pub fn with_split(mut self, test_size: f64, seed: u64) -> Self {
        self.params.test_size = test_size;
        self.params.seed = seed;
        self
    }

    fn dataset_for(&self, input: Option<ValidatedDataset>, p: &TrainParams) -> Result<(DatasetRef, String), CoreEngineError> {
        match (input, &p.source) {
            (Some(validated), _) => Ok((validated.dataset, validated.label_column)),
            (None, Some(source)) => Ok((source.dataset_ref()?, source.label_column.clone())),
            (None, None) => Err(CoreEngineError::MissingInputs(TypedStep::id(self).to_string())),
        }
    }

    fn execute(&self, input: Option<ValidatedDataset>, p: TrainParams, rt: &StepRuntime) -> Result<TrainedBundle, CoreEngineError> {
        let (dataset, label_column) = self.dataset_for(input, &p)?;
        let config = TrainConfig { test_size: p.test_size,
                                   seed: p.seed,
                                   ..TrainConfig::default() };
        let store = connect(self.provider.as_ref(), &dataset.endpoint, rt)?;
        let outcome = train_from_store(store.as_ref(), &dataset, &label_column, &config).map_err(step_error)?;

        let model_bytes = outcome.pipeline.model_json().map_err(|e| step_error(e.into()))?;
        let preprocessor_bytes = outcome.pipeline.preprocessor_json().map_err(|e| step_error(e.into()))?;
        let model = FileHandle::write(rt, MODEL_OBJECT, &model_bytes).map_err(step_error)?;
        let preprocessor = FileHandle::write(rt, PREPROCESSOR_OBJECT, &preprocessor_bytes).map_err(step_error)?;
        let metrics = FileHandle::write(rt, METRICS_OBJECT, &pretty(&outcome.metrics)?).map_err(step_error)?;
        Ok(TrainedBundle { model,
                           preprocessor,
                           metrics,
                           schema_version: 1 })
    }
}

impl TypedStep for TrainStep {
    type Params = TrainParams;
    type Input = ValidatedDataset;
    type Output = TrainedBundle;

    fn id(&self) -> &'static str {
        "train_baseline"
    }

    fn kind(&self) -> StepKind {
        self.kind
    }

    fn requires_storage(&self) -> bool {
        true
    }

    fn params_default(&self) -> Self::Params {
        self.params.clone()
    }

    fn run_typed(&self, input: Option<Self::Input>, p: Self::Params, rt: &StepRuntime) -> StepRunResultTyped<Self::Output> {
        self.execute(input, p, rt).into()
    }
}
