//! Resolución de secretos para ejecuciones locales: cada clave del secreto se
//! busca como variable de entorno con el mismo nombre.

use std::env;

use churn_core::SecretResolver;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretResolver;

impl SecretResolver for EnvSecretResolver {
    fn lookup(&self, _secret_name: &str, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_key_from_environment() {
        let key = format!("CHURNFLOW_TEST_SECRET_{}", uuid::Uuid::new_v4().simple());
        assert_eq!(EnvSecretResolver.lookup("minio-connection", &key), None);
        env::set_var(&key, "value");
        assert_eq!(EnvSecretResolver.lookup("minio-connection", &key).as_deref(), Some("value"));
        env::remove_var(&key);
    }
}
