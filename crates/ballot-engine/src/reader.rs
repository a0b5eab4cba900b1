//! Sync reader: rebuilds local collections from the shared record.

use std::sync::Arc;

use tokio::sync::RwLock;

use ballot_app::PollsState;
use ballot_core::effects::LedgerEffects;
use ballot_core::errors::{BallotError, Result};
use ballot_core::identifiers::PollId;
use ballot_core::lifecycle::RecordHandle;
use ballot_core::record::{Poll, Vote};

use crate::lifecycle::Lifecycle;

/// Fetches the shared record and decodes it into the local view state.
///
/// Reads are read-then-replace: on any failure the local state is left
/// untouched, never partially updated. Each call is an independent
/// full-record read; two reads triggered by one refresh may observe
/// different remote states, which is the accepted consistency window.
#[derive(Debug)]
pub struct SyncReader<L> {
    ledger: Arc<L>,
    lifecycle: Arc<Lifecycle>,
    polls: Arc<RwLock<PollsState>>,
}

impl<L> Clone for SyncReader<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            lifecycle: self.lifecycle.clone(),
            polls: self.polls.clone(),
        }
    }
}

impl<L: LedgerEffects> SyncReader<L> {
    /// Create a reader that applies results into `polls`.
    pub fn new(ledger: Arc<L>, lifecycle: Arc<Lifecycle>, polls: Arc<RwLock<PollsState>>) -> Self {
        Self {
            ledger,
            lifecycle,
            polls,
        }
    }

    /// Load all polls, replacing the local poll list.
    pub async fn load_polls(&self, handle: &RecordHandle) -> Result<Vec<Poll>> {
        self.ensure_current(handle).await?;

        let record = self
            .ledger
            .fetch_record(&handle.address())
            .await
            .map_err(|e| BallotError::fetch_failed(e.to_string()))?;

        // A disconnect may have landed while the read was in flight; a
        // retired handle's result must not be applied.
        self.ensure_current(handle).await?;

        tracing::debug!(count = record.polls.len(), "loaded polls");
        self.polls.write().await.replace_polls(record.polls.clone());
        Ok(record.polls)
    }

    /// Load the votes of one poll, replacing that poll's cache entry.
    ///
    /// The ledger has no server-side filtering, so this fetches the whole
    /// record and filters locally, preserving remote submission order.
    pub async fn load_votes(&self, handle: &RecordHandle, poll_id: PollId) -> Result<Vec<Vote>> {
        self.ensure_current(handle).await?;

        let record = self
            .ledger
            .fetch_record(&handle.address())
            .await
            .map_err(|e| BallotError::fetch_failed(e.to_string()))?;

        self.ensure_current(handle).await?;

        let votes: Vec<Vote> = record.votes_for(poll_id).copied().collect();
        tracing::debug!(poll_id = %poll_id, count = votes.len(), "loaded votes");
        self.polls.write().await.replace_votes(poll_id, votes.clone());
        Ok(votes)
    }

    async fn ensure_current(&self, handle: &RecordHandle) -> Result<()> {
        if self.lifecycle.is_current(handle).await {
            Ok(())
        } else {
            Err(BallotError::fetch_failed("record handle is not ready"))
        }
    }
}
