//! Credenciales de storage y su enlace a un secreto de plataforma.
//!
//! Un `SecretBinding` nombra un secreto y mapea cada clave del secreto a la
//! variable de entorno que el step espera. El motor lo resuelve a una
//! `Credential` justo antes de ejecutar cada step que requiere storage.
//! Las credenciales no se serializan, no entran en params, eventos,
//! artifacts ni fingerprints, y su `Debug` está redactado.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreEngineError;
use crate::injection::SecretResolver;

pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretBinding {
    pub secret_name: String,
    /// clave del secreto -> nombre de variable de entorno.
    pub key_to_env: BTreeMap<String, String>,
}

impl SecretBinding {
    /// Binding estilo S3: las claves del secreto se llaman igual que las
    /// variables de entorno que consumen los clientes.
    pub fn s3(secret_name: impl Into<String>) -> Self {
        let key_to_env = [AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY].into_iter()
                                                                  .map(|k| (k.to_string(), k.to_string()))
                                                                  .collect();
        Self { secret_name: secret_name.into(),
               key_to_env }
    }

    /// Resuelve cada clave del secreto y arma la credencial.
    pub fn resolve(&self, resolver: &dyn SecretResolver) -> Result<Credential, CoreEngineError> {
        let mut env = BTreeMap::new();
        for (key, env_name) in &self.key_to_env {
            let value = resolver.lookup(&self.secret_name, key)
                                .ok_or_else(|| CoreEngineError::SecretUnavailable(format!("{}/{}", self.secret_name, key)))?;
            env.insert(env_name.as_str(), value);
        }
        let mut take = |name: &str| {
            env.remove(name)
               .ok_or_else(|| CoreEngineError::SecretUnavailable(format!("{} does not provide {}", self.secret_name, name)))
        };
        let access_key_id = take(AWS_ACCESS_KEY_ID)?;
        let secret_access_key = take(AWS_SECRET_ACCESS_KEY)?;
        Ok(Credential::new(access_key_id, secret_access_key))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_key_id: String,
    secret_access_key: String,
}

impl Credential {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self { access_key_id: access_key_id.into(),
               secret_access_key: secret_access_key.into() }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn is_blank(&self) -> bool {
        self.access_key_id.trim().is_empty() || self.secret_access_key.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
         .field("access_key_id", &"<redacted>")
         .field("secret_access_key", &"<redacted>")
         .finish()
    }
}
