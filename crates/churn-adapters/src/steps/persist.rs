//! PersistStep (Transform): publica el `TrainedBundle` bajo
//! `{models_bucket}/{model_prefix}`.

use std::sync::Arc;

use churn_core::constants::RUN_ID_PLACEHOLDER;
use churn_core::model::StepRuntime;
use churn_core::step::{StepKind, StepRunResultTyped, TypedStep};
use churn_core::CoreEngineError;
use churn_domain::ModelPrefix;
use churn_storage::ObjectStoreProvider;
use serde::{Deserialize, Serialize};

use super::{connect, DEFAULT_S3_ENDPOINT};
use crate::artifacts::{PersistedBundle, TrainedBundle};
use crate::error::step_error;
use crate::ops::persist_bundle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistParams {
    pub s3_endpoint: String,
    pub models_bucket: String,
    /// `domain/variant/run_id`; el run id llega como placeholder y el motor
    /// lo sustituye antes de ejecutar.
    pub model_prefix: String,
}

impl Default for PersistParams {
    fn default() -> Self {
        Self { s3_endpoint: DEFAULT_S3_ENDPOINT.to_string(),
               models_bucket: "models".to_string(),
               model_prefix: format!("churn/baseline/{RUN_ID_PLACEHOLDER}") }
    }
}

#[derive(Debug, Clone)]
pub struct PersistStep {
    params: PersistParams,
    provider: Arc<dyn ObjectStoreProvider>,
}

impl PersistStep {
    pub fn new(params: PersistParams, provider: Arc<dyn ObjectStoreProvider>) -> Self {
        Self { params, provider }
    }

    fn execute(&self, bundle: Option<TrainedBundle>, p: PersistParams, rt: &StepRuntime) -> Result<PersistedBundle, CoreEngineError> {
        let bundle = bundle.ok_or_else(|| CoreEngineError::MissingInputs(TypedStep::id(self).to_string()))?;
        let prefix = ModelPrefix::parse(&p.model_prefix).map_err(step_error)?;
        let store = connect(self.provider.as_ref(), &p.s3_endpoint, rt)?;
        persist_bundle(store.as_ref(), &p.models_bucket, &prefix, &bundle, rt).map_err(step_error)
    }
}

impl TypedStep for PersistStep {
    type Params = PersistParams;
    type Input = TrainedBundle;
    type Output = PersistedBundle;

    fn id(&self) -> &'static str {
        "save_model"
    }

    fn kind(&self) -> StepKind {
        StepKind::Transform
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
