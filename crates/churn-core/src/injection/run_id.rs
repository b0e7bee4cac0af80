//! Resolución del placeholder de run id en params.

use serde_json::Value;

use super::ParamInjector;
use crate::constants::RUN_ID_PLACEHOLDER;
use crate::model::ExecutionContext;

/// Reemplaza `{{$.pipeline_job_name}}` en todos los strings de `value`.
pub fn substitute_run_id(value: &Value, run_id: &str) -> Value {
    match value {
        Value::String(s) if s.contains(RUN_ID_PLACEHOLDER) => Value::String(s.replace(RUN_ID_PLACEHOLDER, run_id)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute_run_id(v, run_id)).collect()),
        Value::Object(map) => Value::Object(map.iter()
                                               .map(|(k, v)| (k.clone(), substitute_run_id(v, run_id)))
                                               .collect()),
        other => other.clone(),
    }
}

/// Inyector instalado por defecto en el engine: resuelve el run id de la
/// ejecución actual.
#[derive(Debug, Default)]
pub struct RunIdInjector;

impl ParamInjector for RunIdInjector {
    fn inject(&self, base: &Value, ctx: &ExecutionContext) -> Value {
        substitute_run_id(base, &ctx.runtime.run_id)
    }
}
