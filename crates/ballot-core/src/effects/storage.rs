//! Key-value persistence effect.
//!
//! The engine's only durable local state is the persisted record identity,
//! held under a single key. The interface is deliberately generic so any
//! durable store (filesystem, browser storage, keychain) can satisfy it.

use async_trait::async_trait;
use thiserror::Error;

/// Storage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The key is not acceptable to the backing store
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
    /// A read failed
    #[error("read failed: {0}")]
    ReadFailed(String),
    /// A write failed
    #[error("write failed: {0}")]
    WriteFailed(String),
    /// A delete failed
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}

/// Durable local key-value storage.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Store a value under a key, replacing any previous value.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Retrieve the value under a key, or `None` if absent.
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove the value under a key. Returns whether anything was removed.
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;
}
