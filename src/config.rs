// ⚙️ Configuration
// Which store backs the registry and where its data lives

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::SqliteRecordStore;
use crate::store::{FileRecordStore, MemoryRecordStore, RecordStore};

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "DEMERIT_REGISTRY_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `persons_path` and `demerits_path`, one record per line
    File,
    /// Single SQLite database at `database_path`
    Sqlite,
    /// Nothing persisted past the process
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub backend: Backend,
    pub persons_path: PathBuf,
    pub demerits_path: PathBuf,
    pub database_path: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            backend: Backend::File,
            persons_path: PathBuf::from("persons.txt"),
            demerits_path: PathBuf::from("demeritPoints.txt"),
            database_path: PathBuf::from("registry.db"),
        }
    }
}

impl RegistryConfig {
    /// Load from a JSON file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Config from `DEMERIT_REGISTRY_CONFIG` if set, otherwise defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Build the store handle injected into record services
    pub fn open_store(&self) -> Result<Arc<dyn RecordStore>> {
        let store: Arc<dyn RecordStore> = match self.backend {
            Backend::File => Arc::new(FileRecordStore::new(
                self.persons_path.clone(),
                self.demerits_path.clone(),
            )),
            Backend::Sqlite => Arc::new(SqliteRecordStore::open(&self.database_path)?),
            Backend::Memory => Arc::new(MemoryRecordStore::new()),
        };
        Ok(store)
    }
}
