//! Contrato del cliente de object storage.

use std::fmt::Debug;

use churn_core::Credential;

use crate::error::StorageError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Lectura y escritura de objetos por bucket + key. Escribir una key
/// existente la reemplaza.
pub trait ObjectStore: Send + Sync {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    fn put_object(&self, bucket: &str, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Keys del bucket que empiezan con `prefix`, ordenadas.
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Único camino por el que un step obtiene un cliente: endpoint más la
/// credencial que el motor le inyectó.
pub trait ObjectStoreProvider: Send + Sync + Debug {
    fn connect(&self, endpoint: &str, credential: &Credential) -> Result<Box<dyn ObjectStore>, StorageError>;
}

pub(crate) fn reject_blank(credential: &Credential) -> Result<(), StorageError> {
    if credential.is_blank() {
        return Err(StorageError::Unauthorized("blank credential".into()));
    }
    Ok(())
}
