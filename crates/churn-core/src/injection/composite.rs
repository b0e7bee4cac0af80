//! `CompositeInjector`: aplica una secuencia de `ParamInjector` en orden fijo.

use serde_json::Value;

use super::merge::merge_json;
use super::param_injector::ParamInjector;
use crate::model::ExecutionContext;

/// Orden de merge: base -> injectors (en orden). Cada inyector ve el
/// resultado acumulado de los anteriores.
#[derive(Debug, Default)]
pub struct CompositeInjector {
    pub injectors: Vec<Box<dyn ParamInjector>>,
}

impl CompositeInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_injectors(inj: Vec<Box<dyn ParamInjector>>) -> Self {
        Self { injectors: inj }
    }

    pub fn apply(&self, base: &Value, ctx: &ExecutionContext) -> Value {
        Self::apply_injectors(&self.injectors, base, ctx)
    }

    /// Variante sin ownership, para inyectores guardados en el `FlowEngine`.
    pub fn apply_injectors(injectors: &[Box<dyn ParamInjector>], base: &Value, ctx: &ExecutionContext) -> Value {
        let mut accumulated = base.clone();
        for inj in injectors.iter() {
            let v = inj.inject(&accumulated, ctx);
            accumulated = merge_json(&accumulated, &v);
        }
        accumulated
    }
}
