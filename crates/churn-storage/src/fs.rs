//! Backend sobre filesystem: cada objeto vive en `<root>/<bucket>/<key>`.
//! Sirve para ejecuciones locales del binario sin un servidor S3.

use std::fs;
use std::path::{Component, Path, PathBuf};

use churn_core::Credential;
use log::debug;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{reject_blank, ObjectStore, ObjectStoreProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Solo segmentos normales: nada de `..`, rutas absolutas ni keys vacías.
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        let safe = |s: &str| {
            !s.is_empty() && Path::new(s).components().all(|c| matches!(c, Component::Normal(_)))
        };
        if !safe(bucket) || bucket.contains('/') || !safe(key) {
            return Err(StorageError::Io(format!("invalid object location {bucket}/{key}")));
        }
        Ok(self.root.join(bucket).join(key))
    }
}

fn collect_keys(dir: &Path, base: &Path, out: &mut Vec<String>) -> Result<(), StorageError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_keys(&path, base, out)?;
        } else if let Ok(rel) = path.strip_prefix(base) {
            let key = rel.components()
                         .map(|c| c.as_os_str().to_string_lossy().into_owned())
                         .collect::<Vec<_>>()
                         .join("/");
            if !key.contains(".tmp-") {
                out.push(key);
            }
        }
    }
    Ok(())
}

impl ObjectStore for FsObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|e| match e.kind() {
                           std::io::ErrorKind::NotFound => StorageError::NotFound { bucket: bucket.to_string(),
                                                                                    key: key.to_string() },
                           _ => StorageError::Io(format!("{}: {e}", path.display())),
                       })
    }

    /// Escribe a un temporal y renombra, así un lector nunca ve un objeto a
    /// medio escribir.
    fn put_object(&self, bucket: &str, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        debug!("fs put {} ({} bytes, {content_type})", path.display(), body.len());
        Ok(())
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let base = self.root.join(bucket);
        if !base.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        collect_keys(&base, &base, &mut keys)?;
        keys.retain(|k| k.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }
}

impl ObjectStoreProvider for FsObjectStore {
    /// El endpoint solo se registra; los objetos siempre van bajo `root`.
    fn connect(&self, endpoint: &str, credential: &Credential) -> Result<Box<dyn ObjectStore>, StorageError> {
        reject_blank(credential)?;
        debug!("filesystem object store at {} standing in for {endpoint}", self.root.display());
        Ok(Box::new(self.clone()))
    }
}
