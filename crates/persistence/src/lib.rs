//! Persistence layer for lead-agent
//!
//! Provides:
//! - A string key-value store seam with in-memory and file-backed stores
//! - `ChatStateRepository`, the per-session `ChatStateStore`
//! - Listing of every stored lead under a namespace

pub mod error;
pub mod file;
pub mod memory;
pub mod repository;

pub use error::PersistenceError;
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use repository::{all_leads, ChatStateRepository, StoredLead};

use std::sync::Arc;

use async_trait::async_trait;
use lead_agent_config::PersistenceConfig;

/// Flat string key-value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;

    /// Keys starting with `prefix`, sorted
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, PersistenceError>;
}

/// Store selected by the configuration
///
/// Disabled persistence still gets an in-memory store so sessions can be
/// restored while the process lives.
pub async fn init(config: &PersistenceConfig) -> Result<Arc<dyn KeyValueStore>, PersistenceError> {
    if config.enabled {
        let store = FileStore::open(&config.data_dir).await?;
        Ok(Arc::new(store))
    } else {
        tracing::info!("Persistence disabled, keeping sessions in memory");
        Ok(Arc::new(InMemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_disabled_is_in_memory() {
        let store = init(&PersistenceConfig::default()).await.unwrap();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_init_enabled_uses_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = PersistenceConfig {
            enabled: true,
            data_dir: dir.path().join("data").to_string_lossy().into_owned(),
            ..Default::default()
        };
        let store = init(&config).await.unwrap();
        store.set("k", "v").await.unwrap();
        assert!(dir.path().join("data").join("k.json").exists());
    }
}
