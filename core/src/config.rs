//! Startup configuration read from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use crate::client::TodoClient;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::store::Store;
use crate::transport::ReqwestTransport;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the todo API.
    pub api_url: String,
    /// Directory holding `storage.json`. `None` keeps the token in memory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: None,
        }
    }
}

impl StoreConfig {
    /// Read `TODO_API_URL` and `TODO_STORAGE_DIR`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("TODO_API_URL").filter(|v| !v.is_empty()) {
            config.api_url = url;
        }
        config.storage_dir = lookup("TODO_STORAGE_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        config
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        match &self.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        }
    }

    /// Build a store talking to `api_url` over reqwest.
    pub fn build_store(&self) -> Store {
        Store::new(
            TodoClient::new(&self.api_url),
            Arc::new(ReqwestTransport::new()),
            self.storage(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::storage::ACCESS_TOKEN_KEY;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = StoreConfig::from_lookup(lookup(&[]));
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.api_url, "http://localhost:3000");
    }

    #[test]
    fn reads_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("TODO_API_URL", "https://todo.example.com/api"),
            ("TODO_STORAGE_DIR", "/tmp/todo"),
        ]));
        assert_eq!(config.api_url, "https://todo.example.com/api");
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/todo")));
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = StoreConfig::from_lookup(lookup(&[("TODO_API_URL", ""), ("TODO_STORAGE_DIR", "")]));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn built_store_hydrates_from_storage_dir() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::new(dir.path()).set(ACCESS_TOKEN_KEY, "persisted");

        let config = StoreConfig {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: Some(dir.path().to_path_buf()),
        };
        let store = config.build_store();
        assert_eq!(store.token().as_deref(), Some("persisted"));
    }
}
