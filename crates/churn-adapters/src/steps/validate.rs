//! ValidateStep (Source): aplica el contrato y deja `schema.json` y
//! `data_profile.json` en su directorio.

use std::sync::Arc;

use churn_core::model::StepRuntime;
use churn_core::step::{StepKind, StepRunResultTyped, TypedStep};
use churn_core::CoreEngineError;
use churn_domain::SchemaContract;
use churn_storage::ObjectStoreProvider;
use serde::{Deserialize, Serialize};

use super::{connect, pretty, DatasetParams};
use crate::artifacts::{FileHandle, ValidatedDataset};
use crate::error::step_error;
use crate::ops::validate_dataset;

pub const SCHEMA_REPORT: &str = "schema.json";
pub const PROFILE_REPORT: &str = "data_profile.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateParams {
    #[serde(flatten)]
    pub dataset: DatasetParams,
    pub min_rows: usize,
}

impl Default for ValidateParams {
    fn default() -> Self {
        Self { dataset: DatasetParams::default(),
               min_rows: 100 }
    }
}

#[derive(Debug, Clone)]
pub struct ValidateStep {
    params: ValidateParams,
    contract: SchemaContract,
    provider: Arc<dyn ObjectStoreProvider>,
}

impl ValidateStep {
    pub fn new(params: ValidateParams, provider: Arc<dyn ObjectStoreProvider>) -> Self {
        Self { params,
               contract: SchemaContract::churn(),
               provider }
    }

    pub fn with_contract(mut self, contract: SchemaContract) -> Self {
        self.contract = contract;
        self
    }

    fn execute(&self, p: ValidateParams, rt: &StepRuntime) -> Result<ValidatedDataset, CoreEngineError> {
        let dataset = p.dataset.dataset_ref()?;
        let store = connect(self.provider.as_ref(), &dataset.endpoint, rt)?;
        let (report, profile) =
            validate_dataset(store.as_ref(), &dataset, &p.dataset.label_column, p.min_rows, &self.contract).map_err(step_error)?;
        let schema_report = FileHandle::write(rt, SCHEMA_REPORT, &pretty(&report)?).map_err(step_error)?;
        let profile_report = FileHandle::write(rt, PROFILE_REPORT, &pretty(&profile)?).map_err(step_error)?;
        Ok(ValidatedDataset { dataset,
                              label_column: report.label_column.clone(),
                              rows: report.rows,
                              schema_report,
                              profile_report,
                              schema_version: 1 })
    }
}

impl TypedStep for ValidateStep {
    type Params = ValidateParams;
    type Input = ValidatedDataset;
    type Output = ValidatedDataset;

    fn id(&self) -> &'static str {
        "ingest_validate"
    }

    fn kind(&self) -> StepKind {
        StepKind::Source
    }

    fn requires_storage(&self) -> bool {
        true
    }

    fn params_default(&self) -> Self::Params {
        self.params.clone()
    }

    fn run_typed(&self, _input: Option<Self::Input>, p: Self::Params, rt: &StepRuntime) -> StepRunResultTyped<Self::Output> {
        self.execute(p, rt).into()
    }
}
