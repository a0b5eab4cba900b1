//! Record locator: identity acquisition for the shared record.

use std::sync::Arc;

use ballot_core::effects::StorageEffects;
use ballot_core::errors::{BallotError, Result};
use ballot_core::identity::RecordIdentity;

/// Storage key holding the persisted record identity.
const IDENTITY_KEY: &str = "record/identity";

/// Derives or loads the identity whose public key is the shared record's
/// address.
///
/// Pure with respect to the ledger (no network I/O) and
/// idempotent: repeated calls within one installation yield the same
/// address. The identity is persisted before it is ever returned, so a
/// crash between generation and remote creation cannot orphan an
/// unresolvable address.
#[derive(Debug)]
pub struct RecordLocator<S> {
    storage: Arc<S>,
}

impl<S: StorageEffects> RecordLocator<S> {
    /// Create a locator over a durable store.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Load the persisted record identity, generating and persisting one on
    /// first use.
    ///
    /// A present-but-undecodable blob is an error, never silently
    /// regenerated: regenerating would strand the existing remote record.
    pub async fn acquire_identity(&self) -> Result<RecordIdentity> {
        let stored = self
            .storage
            .retrieve(IDENTITY_KEY)
            .await
            .map_err(|e| BallotError::storage_failed(format!("load record identity: {e}")))?;

        if let Some(blob) = stored {
            let identity = RecordIdentity::from_persist_bytes(&blob)?;
            tracing::debug!(address = %identity.address(), "using persisted record identity");
            return Ok(identity);
        }

        let identity = RecordIdentity::generate();
        self.storage
            .store(IDENTITY_KEY, identity.to_persist_bytes())
            .await
            .map_err(|e| BallotError::storage_failed(format!("persist record identity: {e}")))?;
        tracing::info!(address = %identity.address(), "generated new record identity");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_testkit::MockStorage;

    #[tokio::test]
    async fn repeated_calls_return_same_address() {
        let storage = Arc::new(MockStorage::new());
        let locator = RecordLocator::new(storage.clone());

        let first = locator.acquire_identity().await.unwrap();
        let second = locator.acquire_identity().await.unwrap();
        assert_eq!(first.address(), second.address());

        // one write ever, one read per call
        assert_eq!(storage.counts().stores, 1);
        assert_eq!(storage.counts().retrieves, 2);
    }

    #[tokio::test]
    async fn persists_before_returning() {
        let storage = Arc::new(MockStorage::new());
        let locator = RecordLocator::new(storage.clone());

        let identity = locator.acquire_identity().await.unwrap();
        let blob = storage.get("record/identity").await.unwrap();
        let restored = RecordIdentity::from_persist_bytes(&blob).unwrap();
        assert_eq!(identity.address(), restored.address());
    }

    #[tokio::test]
    async fn corrupt_blob_is_an_error_not_a_regeneration() {
        let storage = Arc::new(MockStorage::new());
        storage.put("record/identity", b"garbage".to_vec()).await;

        let locator = RecordLocator::new(storage.clone());
        assert!(matches!(
            locator.acquire_identity().await,
            Err(BallotError::Storage { .. })
        ));
        assert_eq!(storage.counts().stores, 0);
    }

    #[tokio::test]
    async fn write_failure_surfaces() {
        let storage = Arc::new(MockStorage::new());
        storage.fail_stores("disk full");

        let locator = RecordLocator::new(storage);
        assert!(matches!(
            locator.acquire_identity().await,
            Err(BallotError::Storage { .. })
        ));
    }
}
