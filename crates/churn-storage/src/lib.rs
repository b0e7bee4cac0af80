//! churn-storage
//!
//! Cliente de object storage por bucket + key, con el contrato mínimo que
//! usan las operaciones del pipeline.
//!
//! Módulos:
//! - `store`: traits `ObjectStore` y `ObjectStoreProvider`.
//! - `memory`: backend en memoria compartido (tests y ejecuciones locales).
//! - `fs`: backend sobre filesystem (`<root>/<bucket>/<key>`).
//! - `config`: carga de configuración desde .env.

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod store;

pub use config::{init_dotenv, StorageConfig};
pub use error::StorageError;
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use store::{ObjectStore, ObjectStoreProvider, JSON_CONTENT_TYPE};
