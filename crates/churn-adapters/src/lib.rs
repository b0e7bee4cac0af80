//! churn-adapters: capa de adaptación Dominio ↔ Core.
//!
//! Este crate provee:
//! - Artifacts tipados que viajan entre steps (`ValidatedDataset`,
//!   `TrainedBundle`, `PersistedBundle`). Llevan handles a archivos locales,
//!   nunca los blobs.
//! - Las tres operaciones del pipeline (`ops`): validar, entrenar, persistir.
//! - Steps tipados que envuelven esas operaciones (`steps`).
//! - Los grafos compilables (`pipelines`).
//!
//! Los errores de dominio llegan al motor como `CoreEngineError::Step` con
//! su clase y código estable (ver `error`).

pub mod artifacts;
pub mod error;
pub mod ops;
pub mod pipelines;
pub mod steps;

pub use artifacts::{FileHandle, PersistedBundle, TrainedBundle, ValidatedDataset};
pub use error::step_error;
pub use pipelines::{GraphKind, PipelineSettings};
pub use steps::{DatasetParams, PersistParams, PersistStep, TrainParams, TrainStep, ValidateParams, ValidateStep};
