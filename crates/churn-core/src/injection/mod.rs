//! Inyección determinista de parámetros y resolución de secretos.

pub mod composite;
pub mod merge;
pub mod param_injector;
pub mod run_id;
pub mod secret_resolver;

pub use composite::CompositeInjector;
pub use merge::merge_json;
pub use param_injector::ParamInjector;
pub use run_id::{substitute_run_id, RunIdInjector};
pub use secret_resolver::{SecretResolver, StaticSecretResolver};
