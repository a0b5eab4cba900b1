//! Filesystem-backed storage handler.

use std::path::PathBuf;

use async_trait::async_trait;
use ballot_core::effects::{StorageEffects, StorageError};
use tokio::fs;

/// Stores each key as a `.dat` file under a base directory.
///
/// Keys may contain path separators; parent directories are created on
/// demand.
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    base_path: PathBuf,
}

impl FilesystemStorage {
    /// Create a handler rooted at `base_path`.
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "key must not be empty".to_string(),
            });
        }
        if key.split('/').any(|part| part == "..") {
            return Err(StorageError::InvalidKey {
                reason: "key must not traverse upward".to_string(),
            });
        }
        Ok(self.base_path.join(format!("{key}.dat")))
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorage {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let file_path = self.file_path(key)?;
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::WriteFailed(format!("create directory: {e}")))?;
        }
        fs::write(&file_path, value)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("write file: {e}")))
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let file_path = self.file_path(key)?;
        match fs::read(&file_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("read file: {e}"))),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let file_path = self.file_path(key)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!("remove file: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_retrieve_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(dir.path().to_path_buf());

        assert_eq!(storage.retrieve("record/identity").await.unwrap(), None);
        storage
            .store("record/identity", b"blob".to_vec())
            .await
            .unwrap();
        assert_eq!(
            storage.retrieve("record/identity").await.unwrap(),
            Some(b"blob".to_vec())
        );
        assert!(storage.remove("record/identity").await.unwrap());
        assert!(!storage.remove("record/identity").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_bad_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(dir.path().to_path_buf());
        assert!(storage.retrieve("").await.is_err());
        assert!(storage.retrieve("../escape").await.is_err());
    }
}
