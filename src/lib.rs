//! churnflow
//!
//! Librería de la aplicación sobre los crates del workspace:
//! - `config`: `AppConfig` desde variables `CHURNFLOW_*`.
//! - `secrets`: resolución de credenciales desde el entorno.
//! - `exit_code`: código de salida del binario por clase de error.

pub mod config;
pub mod secrets;

pub use churn_adapters::{GraphKind, PipelineSettings};
pub use config::{AppConfig, ConfigError};
pub use secrets::EnvSecretResolver;

use churn_core::ErrorClass;

pub const EXIT_USAGE: u8 = 2;

/// Códigos estilo sysexits: 65 dato inválido, 70 fallo interno, 75 temporal.
/// Un run id o prefijo inválido sale como error de uso.
pub fn exit_code(class: ErrorClass) -> u8 {
    match class {
        ErrorClass::Configuration => EXIT_USAGE,
        ErrorClass::Validation => 65,
        ErrorClass::Fatal => 70,
        ErrorClass::Retryable => 75,
    }
}
