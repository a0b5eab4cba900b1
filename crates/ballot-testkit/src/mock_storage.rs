//! In-memory storage double with call counting and failure injection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ballot_core::effects::{StorageEffects, StorageError};

/// Per-method call counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageCounts {
    /// Number of `store` calls
    pub stores: usize,
    /// Number of `retrieve` calls
    pub retrieves: usize,
    /// Number of `remove` calls
    pub removes: usize,
}

#[derive(Debug, Default)]
struct MockStorageState {
    data: HashMap<String, Vec<u8>>,
    counts: StorageCounts,
    fail_stores: Option<String>,
    fail_retrieves: Option<String>,
}

/// Deterministic [`StorageEffects`] double.
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    state: Arc<Mutex<MockStorageState>>,
}

impl MockStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current call counts.
    pub fn counts(&self) -> StorageCounts {
        self.state.lock().unwrap().counts
    }

    /// Make every subsequent `store` fail with `message`.
    pub fn fail_stores(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_stores = Some(message.into());
    }

    /// Make every subsequent `retrieve` fail with `message`.
    pub fn fail_retrieves(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_retrieves = Some(message.into());
    }

    /// Seed a value directly, bypassing counters.
    pub async fn put(&self, key: &str, value: Vec<u8>) {
        self.state.lock().unwrap().data.insert(key.to_string(), value);
    }

    /// Read a value directly, bypassing counters.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().data.get(key).cloned()
    }
}

#[async_trait]
impl StorageEffects for MockStorage {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.counts.stores += 1;
        if let Some(message) = &state.fail_stores {
            return Err(StorageError::WriteFailed(message.clone()));
        }
        state.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.counts.retrieves += 1;
        if let Some(message) = &state.fail_retrieves {
            return Err(StorageError::ReadFailed(message.clone()));
        }
        Ok(state.data.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.counts.removes += 1;
        Ok(state.data.remove(key).is_some())
    }
}
