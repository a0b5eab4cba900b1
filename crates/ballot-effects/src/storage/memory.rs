//! In-memory storage handler.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ballot_core::effects::{StorageEffects, StorageError};
use tokio::sync::RwLock;

/// Volatile storage for hosts without a durable store and for examples.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageEffects for MemoryStorage {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.data.write().await.remove(key).is_some())
    }
}
