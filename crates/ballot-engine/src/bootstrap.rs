//! Bootstrap coordinator: ensures the shared record exists, exactly once.

use std::sync::Arc;

use ballot_core::effects::{LedgerEffects, LedgerError, StorageEffects};
use ballot_core::errors::{BallotError, Result};
use ballot_core::identifiers::Address;
use ballot_core::lifecycle::{RecordHandle, RecordPhase};

use crate::lifecycle::Lifecycle;
use crate::locator::RecordLocator;

/// Drives the record lifecycle `Uninitialized → Initializing → {Ready,
/// Failed}`.
///
/// Re-entry after a restart never re-initializes an existing record: the
/// existence query short-circuits before any write. At most one network
/// write happens per transition into `Initializing`, and none while
/// `Ready`.
#[derive(Debug)]
pub struct BootstrapCoordinator<S, L> {
    locator: RecordLocator<S>,
    ledger: Arc<L>,
    lifecycle: Arc<Lifecycle>,
}

impl<S, L> BootstrapCoordinator<S, L>
where
    S: StorageEffects,
    L: LedgerEffects,
{
    /// Create a coordinator sharing `lifecycle` with readers and writers.
    pub fn new(storage: Arc<S>, ledger: Arc<L>, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            locator: RecordLocator::new(storage),
            ledger,
            lifecycle,
        }
    }

    /// Ensure the shared record exists remotely and return a ready handle.
    ///
    /// Idempotent: when already ready, returns the current handle without
    /// touching the network. Concurrent calls are serialized by the
    /// single-flight gate; the loser observes `Busy` rather than racing a
    /// second initialize.
    pub async fn ensure_record(&self) -> Result<RecordHandle> {
        if let Some(handle) = self.lifecycle.ready_handle().await {
            return Ok(handle);
        }

        let epoch = match self.lifecycle.begin().await {
            Ok(epoch) => epoch,
            // Lost a race to a concurrent bootstrap that just completed.
            Err(e) => return self.lifecycle.ready_handle().await.ok_or(e),
        };

        match self.try_bootstrap().await {
            Ok(address) => {
                let handle = self.lifecycle.complete(epoch, address).await?;
                tracing::info!(address = %address, "shared record ready");
                Ok(handle)
            }
            Err(error) => {
                tracing::warn!(error = %error, "bootstrap failed");
                self.lifecycle.fail(epoch, error.clone()).await;
                Err(error)
            }
        }
    }

    /// Explicit retry after a failure; runs the whole sequence again.
    pub async fn retry(&self) -> Result<RecordHandle> {
        self.ensure_record().await
    }

    /// Signer disconnect: invalidate local readiness without touching the
    /// remote record.
    pub async fn disconnect(&self) {
        self.lifecycle.reset().await;
    }

    /// Current phase, record address, and last error, for status display.
    pub async fn status(&self) -> (RecordPhase, Option<Address>, Option<BallotError>) {
        self.lifecycle.snapshot().await
    }

    async fn try_bootstrap(&self) -> Result<Address> {
        let identity = self.locator.acquire_identity().await?;
        let address = identity.address();

        let exists = self
            .ledger
            .account_exists(&address)
            .await
            .map_err(map_query_error)?;

        if exists {
            tracing::debug!(address = %address, "record already exists, skipping initialize");
            return Ok(address);
        }

        let tx = self
            .ledger
            .initialize_record(&identity)
            .await
            .map_err(|e| BallotError::remote_creation(e.to_string()))?;
        tracing::info!(address = %address, tx = %tx, "record initialized");
        Ok(address)
    }
}

fn map_query_error(error: LedgerError) -> BallotError {
    match error {
        LedgerError::Unreachable(message) => BallotError::connection(message),
        other => BallotError::remote_creation(other.to_string()),
    }
}
