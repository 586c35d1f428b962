//! File-backed key-value store
//!
//! One `{key}.json` file per key in a single directory. Writes go to a
//! temporary file first and are renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{KeyValueStore, PersistenceError};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating the directory if needed
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!(dir = %dir.display(), "File store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become file names, so only a safe alphabet is accepted
    fn validate_key(key: &str) -> Result<(), PersistenceError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if valid {
            Ok(())
        } else {
            Err(PersistenceError::InvalidKey(key.to_string()))
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        Self::validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, PersistenceError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|s| s.to_str()) {
                if key.starts_with(prefix) {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("sessions")).await.unwrap();

        assert!(store.get("lead_1").await.unwrap().is_none());
        store.set("lead_1", "{\"a\":1}").await.unwrap();
        assert_eq!(store.get("lead_1").await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(store.dir().join("lead_1.json").exists());

        store.remove("lead_1").await.unwrap();
        store.remove("lead_1").await.unwrap();
        assert!(store.get("lead_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        for key in ["", "../escape", "a/b", ".hidden", "con espacio"] {
            let err = store.set(key, "x").await.unwrap_err();
            assert!(matches!(err, PersistenceError::InvalidKey(_)), "{}", key);
        }
    }

    #[tokio::test]
    async fn test_keys_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set("p_2", "").await.unwrap();
        store.set("p_1", "").await.unwrap();
        store.set("other", "").await.unwrap();
        std::fs::write(dir.path().join("p_notes.txt"), "x").unwrap();

        assert_eq!(store.keys("p_").await.unwrap(), ["p_1", "p_2"]);
    }
}
