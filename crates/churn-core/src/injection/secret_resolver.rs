//! Fuente de valores de secretos de plataforma.

use std::collections::BTreeMap;

/// Devuelve el valor de `key` dentro del secreto `secret_name`.
pub trait SecretResolver: std::fmt::Debug {
    fn lookup(&self, secret_name: &str, key: &str) -> Option<String>;
}

/// Resolver con valores fijos en memoria.
#[derive(Default)]
pub struct StaticSecretResolver {
    values: BTreeMap<(String, String), String>,
}

impl StaticSecretResolver {
    pub fn with(mut self, secret_name: &str, key: &str, value: &str) -> Self {
        self.values.insert((secret_name.to_string(), key.to_string()), value.to_string());
        self
    }
}

impl std::fmt::Debug for StaticSecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<_> = self.values.keys().collect();
        f.debug_struct("StaticSecretResolver").field("keys", &keys).finish()
    }
}

impl SecretResolver for StaticSecretResolver {
    fn lookup(&self, secret_name: &str, key: &str) -> Option<String> {
        self.values.get(&(secret_name.to_string(), key.to_string())).cloned()
    }
}
