//! Constantes del motor core.
//!
//! Valores estáticos que participan en el cálculo de fingerprints y en la
//! resolución de parámetros por ejecución.

/// Versión lógica del motor. Forma parte del `StepFingerprintInput`: un cambio
/// de versión invalida los fingerprints aunque la definición no cambie.
pub const ENGINE_VERSION: &str = "C1.0";

/// Placeholder que la plataforma sustituye por el identificador de ejecución.
/// Aparece sin resolver en las definiciones compiladas y en los params base.
pub const RUN_ID_PLACEHOLDER: &str = "{{$.pipeline_job_name}}";
