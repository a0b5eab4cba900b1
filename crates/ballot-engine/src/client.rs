//! Client facade: components wired to the navigation state machine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use ballot_app::{NavEffect, NavigationState, PollTally, PollsState, StatusBanner, View};
use ballot_core::config::ClientConfig;
use ballot_core::effects::{LedgerEffects, StorageEffects};
use ballot_core::errors::Result;
use ballot_core::identifiers::{OptionId, PollId};
use ballot_core::lifecycle::RecordHandle;
use ballot_core::record::{Poll, Vote};

use crate::bootstrap::BootstrapCoordinator;
use crate::lifecycle::Lifecycle;
use crate::mutation::MutationPipeline;
use crate::reader::SyncReader;

/// Everything a front end talks to: bootstrap, reads, writes, and screen
/// state, sharing one lifecycle and one view state.
///
/// Renderers pull state through the query methods and push the actions;
/// nothing here renders.
#[derive(Debug)]
pub struct BallotClient<S, L> {
    config: ClientConfig,
    bootstrap: BootstrapCoordinator<S, L>,
    reader: SyncReader<L>,
    mutations: MutationPipeline<L>,
    polls: Arc<RwLock<PollsState>>,
    navigation: RwLock<NavigationState>,
}

impl<S, L> BallotClient<S, L>
where
    S: StorageEffects,
    L: LedgerEffects,
{
    /// Wire the engine components over the given effect handlers.
    pub fn new(storage: Arc<S>, ledger: Arc<L>, config: ClientConfig) -> Self {
        let lifecycle = Arc::new(Lifecycle::new());
        let polls = Arc::new(RwLock::new(PollsState::new()));
        let reader = SyncReader::new(ledger.clone(), lifecycle.clone(), polls.clone());
        let mutations = MutationPipeline::new(
            ledger.clone(),
            lifecycle.clone(),
            polls.clone(),
            reader.clone(),
            &config,
        );
        let bootstrap = BootstrapCoordinator::new(storage, ledger, lifecycle);
        Self {
            config,
            bootstrap,
            reader,
            mutations,
            polls,
            navigation: RwLock::new(NavigationState::new()),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bootstrap the shared record and perform the initial poll load.
    ///
    /// The initial load is best-effort: a read failure leaves the record
    /// ready and is retried by the next refresh.
    pub async fn connect(&self) -> Result<RecordHandle> {
        let handle = self.bootstrap.ensure_record().await?;
        if let Err(error) = self.reader.load_polls(&handle).await {
            tracing::warn!(error = %error, "initial poll load failed");
        }
        Ok(handle)
    }

    /// Explicit retry of a failed bootstrap.
    pub async fn retry(&self) -> Result<RecordHandle> {
        self.connect().await
    }

    /// Signer disconnect: invalidate the handle and drop local state.
    pub async fn disconnect(&self) {
        self.bootstrap.disconnect().await;
        self.polls.write().await.clear();
        self.navigation.write().await.go_back();
    }

    /// Status line for the banner renderer.
    pub async fn status(&self) -> StatusBanner {
        let (phase, address, error) = self.bootstrap.status().await;
        StatusBanner::derive(phase, address, error.as_ref())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Refresh and return the poll list.
    pub async fn refresh_polls(&self, handle: &RecordHandle) -> Result<Vec<Poll>> {
        self.reader.load_polls(handle).await
    }

    /// Refresh and return one poll's votes.
    pub async fn refresh_votes(&self, handle: &RecordHandle, poll_id: PollId) -> Result<Vec<Vote>> {
        self.reader.load_votes(handle, poll_id).await
    }

    /// Currently cached polls.
    pub async fn polls(&self) -> Vec<Poll> {
        self.polls.read().await.polls().to_vec()
    }

    /// Aggregated cached results for one poll.
    pub async fn tally(&self, poll_id: PollId) -> Option<PollTally> {
        self.polls.read().await.tally(poll_id)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create a poll; see [`MutationPipeline::create_poll`].
    pub async fn create_poll(
        &self,
        handle: &RecordHandle,
        title: &str,
        options: &[String],
    ) -> Result<PollId> {
        self.mutations.create_poll(handle, title, options).await
    }

    /// Cast a vote, then switch the vote form to results after the
    /// confirmation pause.
    pub async fn cast_vote(
        &self,
        handle: &RecordHandle,
        poll_id: PollId,
        option: OptionId,
    ) -> Result<()> {
        self.mutations.cast_vote(handle, poll_id, option).await?;
        if self.config.confirm_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.confirm_delay_ms)).await;
        }
        self.navigation.write().await.vote_confirmed();
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// The active screen.
    pub async fn view(&self) -> View {
        self.navigation.read().await.view()
    }

    /// Open the vote form for a poll. Rejected for closed or unknown polls.
    pub async fn select_for_voting(&self, poll_id: PollId) -> bool {
        let polls = self.polls.read().await;
        self.navigation.write().await.select_for_voting(&polls, poll_id)
    }

    /// Open the results screen for a poll and refresh its votes.
    ///
    /// The screen renders from the cache; the refresh failure is localized
    /// and logged, not surfaced.
    pub async fn select_for_results(&self, handle: &RecordHandle, poll_id: PollId) -> bool {
        let effect = {
            let polls = self.polls.read().await;
            self.navigation
                .write()
                .await
                .select_for_results(&polls, poll_id)
        };
        match effect {
            Some(NavEffect::RefreshVotes(id)) => {
                if let Err(error) = self.reader.load_votes(handle, id).await {
                    tracing::warn!(error = %error, poll_id = %id, "results refresh failed");
                }
                true
            }
            None => false,
        }
    }

    /// Return to the poll list.
    pub async fn go_back(&self) {
        self.navigation.write().await.go_back();
    }
}
