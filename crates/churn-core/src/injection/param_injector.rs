//! Contrato para inyectores de parámetros.
//!
//! Un `ParamInjector` recibe los params acumulados del step y el
//! `ExecutionContext` y devuelve un `Value` que se mergea encima. Deben ser
//! deterministas y sin efectos secundarios.

use crate::model::ExecutionContext;
use serde_json::Value;

pub trait ParamInjector: Send + Sync + std::fmt::Debug {
    fn inject(&self, base: &Value, ctx: &ExecutionContext) -> Value;
}
