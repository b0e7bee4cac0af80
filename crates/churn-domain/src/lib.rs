// churn-domain library entry point
pub mod contract;
pub mod dataset;
pub mod error;
pub mod frame;
pub mod synthetic;
pub mod validation;

pub use contract::SchemaContract;
pub use dataset::{DatasetRef, ModelPrefix, METRICS_OBJECT, MODEL_OBJECT, PREPROCESSOR_OBJECT};
pub use error::{ContractViolation, DomainError};
pub use frame::{DType, Frame};
pub use synthetic::synthetic_churn_csv;
pub use validation::{validate_frame, DataProfile, ValidationReport};
