use serde::Serialize;
use serde_json::Value;

/// Insumos del fingerprint de un step, antes de canonicalizar y hashear.
///
/// `params` son los params base: el run id se inyecta después y no entra al
/// fingerprint, de modo que dos ejecuciones de la misma definición sobre el
/// mismo input comparten identidad de step.
#[derive(Serialize)]
pub struct StepFingerprintInput<'a> {
    pub engine_version: &'a str,
    pub step_id: &'a str,
    pub step_index: usize,
    pub input_hashes: &'a [String],
    pub output_hashes: &'a [String],
    pub params: &'a Value,
    pub definition_hash: &'a str,
}
