//! Carga de configuración del storage desde variables de entorno.
//! Usa `CHURNFLOW_STORAGE_ROOT` como raíz del backend de filesystem.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

pub const STORAGE_ROOT_ENV: &str = "CHURNFLOW_STORAGE_ROOT";
pub const DEFAULT_STORAGE_ROOT: &str = "./object-store";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let root = env::var(STORAGE_ROOT_ENV).ok()
                                             .filter(|v| !v.trim().is_empty())
                                             .unwrap_or_else(|| DEFAULT_STORAGE_ROOT.to_string());
        Self { root: PathBuf::from(root) }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
