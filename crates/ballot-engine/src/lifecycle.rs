//! Shared lifecycle state behind the bootstrap coordinator.
//!
//! One epoch counter guards every read and write: a disconnect bumps it,
//! which retires all outstanding handles. Completions that arrive for a
//! retired epoch are dropped, never applied.

use tokio::sync::RwLock;

use ballot_core::errors::{BallotError, Result};
use ballot_core::identifiers::Address;
use ballot_core::lifecycle::{RecordHandle, RecordPhase};

#[derive(Debug, Default)]
struct Inner {
    phase: RecordPhase,
    address: Option<Address>,
    last_error: Option<BallotError>,
    epoch: u64,
}

/// Record readiness shared between the coordinator, reader, and pipeline.
#[derive(Debug, Default)]
pub struct Lifecycle {
    inner: RwLock<Inner>,
}

impl Lifecycle {
    /// Create a fresh, uninitialized lifecycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, address, and last bootstrap error, for status display.
    pub async fn snapshot(&self) -> (RecordPhase, Option<Address>, Option<BallotError>) {
        let inner = self.inner.read().await;
        (inner.phase, inner.address, inner.last_error.clone())
    }

    /// The current handle, when the record is ready.
    pub async fn ready_handle(&self) -> Option<RecordHandle> {
        let inner = self.inner.read().await;
        match (inner.phase, inner.address) {
            (RecordPhase::Ready, Some(address)) => Some(RecordHandle::new(address, inner.epoch)),
            _ => None,
        }
    }

    /// Whether `handle` still names the ready record of the current epoch.
    pub async fn is_current(&self, handle: &RecordHandle) -> bool {
        let inner = self.inner.read().await;
        inner.phase.is_ready()
            && inner.epoch == handle.epoch()
            && inner.address == Some(handle.address())
    }

    /// Enter `Initializing`, enforcing the single-flight gate.
    pub(crate) async fn begin(&self) -> Result<u64> {
        let mut inner = self.inner.write().await;
        match inner.phase {
            RecordPhase::Initializing => Err(BallotError::busy("bootstrap already in flight")),
            RecordPhase::Ready => Err(BallotError::busy("record already ready")),
            RecordPhase::Uninitialized | RecordPhase::Failed => {
                inner.phase = RecordPhase::Initializing;
                inner.last_error = None;
                Ok(inner.epoch)
            }
        }
    }

    /// Mark the bootstrap attempt for `epoch` ready.
    ///
    /// Refused when the epoch was retired mid-flight (disconnect during
    /// bootstrap): local readiness must not resurrect.
    pub(crate) async fn complete(&self, epoch: u64, address: Address) -> Result<RecordHandle> {
        let mut inner = self.inner.write().await;
        if inner.epoch != epoch || inner.phase != RecordPhase::Initializing {
            tracing::debug!(epoch, "dropping late bootstrap completion");
            return Err(BallotError::connection("record handle was reset"));
        }
        inner.phase = RecordPhase::Ready;
        inner.address = Some(address);
        Ok(RecordHandle::new(address, epoch))
    }

    /// Record a failed bootstrap attempt for `epoch`.
    pub(crate) async fn fail(&self, epoch: u64, error: BallotError) {
        let mut inner = self.inner.write().await;
        if inner.epoch != epoch || inner.phase != RecordPhase::Initializing {
            tracing::debug!(epoch, "dropping late bootstrap failure");
            return;
        }
        inner.phase = RecordPhase::Failed;
        inner.last_error = Some(error);
    }

    /// Retire the current epoch: phase back to `Uninitialized`, handles
    /// invalidated. The remote record itself persists.
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.epoch += 1;
        inner.phase = RecordPhase::Uninitialized;
        inner.address = None;
        inner.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn begin_complete_ready() {
        let lifecycle = Lifecycle::new();
        let epoch = lifecycle.begin().await.unwrap();
        let addr = Address::from_bytes([1; 32]);
        let handle = lifecycle.complete(epoch, addr).await.unwrap();
        assert!(lifecycle.is_current(&handle).await);
        assert_eq!(lifecycle.ready_handle().await, Some(handle));
    }

    #[tokio::test]
    async fn begin_is_single_flight() {
        let lifecycle = Lifecycle::new();
        lifecycle.begin().await.unwrap();
        assert!(matches!(
            lifecycle.begin().await,
            Err(BallotError::Busy { .. })
        ));
    }

    #[tokio::test]
    async fn reset_retires_handles_and_late_completions() {
        let lifecycle = Lifecycle::new();
        let epoch = lifecycle.begin().await.unwrap();
        lifecycle.reset().await;

        let addr = Address::from_bytes([2; 32]);
        assert!(lifecycle.complete(epoch, addr).await.is_err());
        assert_eq!(lifecycle.ready_handle().await, None);

        let stale = RecordHandle::new(addr, epoch);
        assert!(!lifecycle.is_current(&stale).await);
    }

    #[tokio::test]
    async fn failed_allows_retry() {
        let lifecycle = Lifecycle::new();
        let epoch = lifecycle.begin().await.unwrap();
        lifecycle.fail(epoch, BallotError::remote_creation("boom")).await;

        let (phase, _, error) = lifecycle.snapshot().await;
        assert_eq!(phase, RecordPhase::Failed);
        assert!(error.is_some());

        // Failed → Initializing on explicit retry
        assert!(lifecycle.begin().await.is_ok());
    }
}
