//! Backend en memoria. Los clones comparten el mismo contenido, así un test
//! puede sembrar datos, pasar el provider al pipeline e inspeccionar lo
//! escrito.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use churn_core::Credential;
use log::debug;

use crate::error::StorageError;
use crate::store::{reject_blank, ObjectStore, ObjectStoreProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct Inner {
    objects: BTreeMap<(String, String), StoredObject>,
    failing_puts: BTreeSet<String>,
    unreachable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Unavailable("in-memory store lock poisoned".into()))
    }

    /// Hace fallar toda escritura cuya key termine en `suffix`.
    pub fn fail_puts_ending_with(&self, suffix: impl Into<String>) {
        if let Ok(mut inner) = self.lock() {
            inner.failing_puts.insert(suffix.into());
        }
    }

    /// Simula un endpoint caído: `connect` falla con `Unavailable`.
    pub fn set_unreachable(&self, unreachable: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.unreachable = unreachable;
        }
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.lock()
            .ok()
            .and_then(|inner| inner.objects.get(&(bucket.to_string(), key.to_string())).cloned())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let inner = self.lock()?;
        inner.objects
             .get(&(bucket.to_string(), key.to_string()))
             .map(|o| o.body.clone())
             .ok_or_else(|| StorageError::NotFound { bucket: bucket.to_string(),
                                                     key: key.to_string() })
    }

    fn put_object(&self, bucket: &str, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        if inner.failing_puts.iter().any(|s| key.ends_with(s.as_str())) {
            return Err(StorageError::Unavailable(format!("injected failure writing {bucket}/{key}")));
        }
        debug!("memory put {bucket}/{key} ({} bytes, {content_type})", body.len());
        inner.objects.insert((bucket.to_string(), key.to_string()),
                             StoredObject { body: body.to_vec(),
                                            content_type: content_type.to_string() });
        Ok(())
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let inner = self.lock()?;
        Ok(inner.objects
                .keys()
                .filter(|(b, k)| b == bucket && k.starts_with(prefix))
                .map(|(_, k)| k.clone())
                .collect())
    }
}

impl ObjectStoreProvider for InMemoryObjectStore {
    fn connect(&self, endpoint: &str, credential: &Credential) -> Result<Box<dyn ObjectStore>, StorageError> {
        reject_blank(credential)?;
        if self.lock()?.unreachable {
            return Err(StorageError::Unavailable(format!("cannot reach {endpoint}")));
        }
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cred() -> Credential {
        Credential::new("ak", "sk")
    }

    #[test]
    fn clones_share_objects() {
        let store = InMemoryObjectStore::new();
        let client = store.connect("http://local", &cred()).unwrap();
        client.put_object("models", "churn/baseline/r1/model.json", b"{}", "application/json")
              .unwrap();
        assert_eq!(store.object("models", "churn/baseline/r1/model.json").unwrap().content_type,
                   "application/json");
        assert_eq!(client.list_objects("models", "churn/baseline/").unwrap(),
                   vec!["churn/baseline/r1/model.json".to_string()]);
    }

    #[test]
    fn blank_credential_is_unauthorized() {
        let store = InMemoryObjectStore::new();
        let err = store.connect("http://local", &Credential::new("", "sk")).err().unwrap();
        assert!(matches!(err, StorageError::Unauthorized(_)));
    }

    #[test]
    fn injected_put_failure() {
        let store = InMemoryObjectStore::new();
        store.fail_puts_ending_with("preprocessor.json");
        assert!(store.put_object("models", "a/b/c/preprocessor.json", b"{}", "application/json")
                     .is_err());
        assert!(store.put_object("models", "a/b/c/model.json", b"{}", "application/json")
                     .is_ok());
    }

    #[test]
    fn missing_object_is_not_found() {
        let store = InMemoryObjectStore::new();
        assert!(matches!(store.get_object("dataset", "nope.csv"), Err(StorageError::NotFound { .. })));
    }
}
