//! Mutation pipeline: poll creation and optimistic voting.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use ballot_app::PollsState;
use ballot_core::config::ClientConfig;
use ballot_core::effects::LedgerEffects;
use ballot_core::errors::{BallotError, Result};
use ballot_core::identifiers::{OptionId, PollId};
use ballot_core::lifecycle::RecordHandle;
use ballot_core::record::Vote;
use ballot_core::validation::validate_poll_input;

use crate::lifecycle::Lifecycle;
use crate::reader::SyncReader;

/// Submits create-poll and cast-vote operations to the ledger.
///
/// Polls are never inserted locally before confirmation; they become
/// visible only through a remote read. Votes are the opposite: applied
/// optimistically and rolled back if the submission fails.
#[derive(Debug)]
pub struct MutationPipeline<L> {
    ledger: Arc<L>,
    lifecycle: Arc<Lifecycle>,
    polls: Arc<RwLock<PollsState>>,
    reader: SyncReader<L>,
    /// Poll ids with a vote submission in flight; one per poll at a time.
    pending_votes: Mutex<HashSet<PollId>>,
    min_balance: u64,
    top_up_amount: u64,
}

impl<L: LedgerEffects> MutationPipeline<L> {
    /// Create a pipeline sharing state with `reader`.
    pub fn new(
        ledger: Arc<L>,
        lifecycle: Arc<Lifecycle>,
        polls: Arc<RwLock<PollsState>>,
        reader: SyncReader<L>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            ledger,
            lifecycle,
            polls,
            reader,
            pending_votes: Mutex::new(HashSet::new()),
            min_balance: config.min_balance,
            top_up_amount: config.top_up_amount,
        }
    }

    /// Create a poll and return its ledger-assigned id.
    ///
    /// Invalid input is rejected before any remote call. The balance
    /// check and top-up are best-effort: when the environment does not
    /// support topping up, the create is attempted anyway.
    pub async fn create_poll(
        &self,
        handle: &RecordHandle,
        title: &str,
        options: &[String],
    ) -> Result<PollId> {
        let draft = validate_poll_input(title, options)?;

        if !self.lifecycle.is_current(handle).await {
            return Err(BallotError::creation("record handle is not ready"));
        }

        self.top_up_if_low().await;

        let tx = self
            .ledger
            .create_poll(&handle.address(), &draft.title, &draft.options)
            .await
            .map_err(|e| BallotError::creation(e.to_string()))?;
        tracing::info!(tx = %tx, title = %draft.title, "poll created");

        // The ledger assigns the id; learn it from the refreshed list,
        // where the new poll is last in creation order.
        let polls = self.reader.load_polls(handle).await?;
        polls
            .last()
            .map(|p| p.id)
            .ok_or_else(|| BallotError::creation("created poll not visible after refresh"))
    }

    /// Cast a vote, optimistically.
    ///
    /// The vote appears in the local cache immediately; a confirmed
    /// submission is reconciled by an authoritative re-read, a failed one
    /// is rolled back before the error is surfaced. A second vote for the
    /// same poll while one is in flight is rejected with `Busy`, not
    /// queued; overlapping optimistic appends would double count.
    pub async fn cast_vote(
        &self,
        handle: &RecordHandle,
        poll_id: PollId,
        option: OptionId,
    ) -> Result<()> {
        if !self.lifecycle.is_current(handle).await {
            return Err(BallotError::vote_rejected("record handle is not ready"));
        }

        {
            let polls = self.polls.read().await;
            let poll = polls
                .poll(poll_id)
                .ok_or_else(|| BallotError::invalid(format!("unknown poll {poll_id}")))?;
            if poll.closed {
                return Err(BallotError::invalid(format!("{poll_id} is closed")));
            }
            if !poll.has_option(option) {
                return Err(BallotError::invalid(format!(
                    "{option} does not belong to {poll_id}"
                )));
            }
        }

        {
            let mut pending = self.pending_votes.lock().await;
            if !pending.insert(poll_id) {
                return Err(BallotError::busy(format!(
                    "a vote for {poll_id} is already in flight"
                )));
            }
        }

        let result = self.submit_vote(handle, poll_id, option).await;
        self.pending_votes.lock().await.remove(&poll_id);
        result
    }

    async fn submit_vote(
        &self,
        handle: &RecordHandle,
        poll_id: PollId,
        option: OptionId,
    ) -> Result<()> {
        self.polls.write().await.push_vote(Vote { poll_id, option });

        match self.ledger.vote(&handle.address(), poll_id, option).await {
            Ok(tx) => {
                tracing::info!(tx = %tx, poll_id = %poll_id, option = %option, "vote confirmed");
                // Reconcile with the authoritative record; the optimistic
                // entry is superseded by the replace, not merely kept. A
                // failed reconcile is a localized read failure; the vote
                // itself stands.
                if let Err(error) = self.reader.load_polls(handle).await {
                    tracing::warn!(error = %error, "post-vote poll refresh failed");
                } else if let Err(error) = self.reader.load_votes(handle, poll_id).await {
                    tracing::warn!(error = %error, poll_id = %poll_id, "post-vote vote refresh failed");
                }
                Ok(())
            }
            Err(error) => {
                self.polls.write().await.pop_vote(poll_id);
                Err(BallotError::vote_rejected(error.to_string()))
            }
        }
    }

    async fn top_up_if_low(&self) {
        match self.ledger.balance().await {
            Ok(balance) if balance < self.min_balance => {
                tracing::info!(balance, floor = self.min_balance, "requesting balance top-up");
                match self.ledger.request_top_up(self.top_up_amount).await {
                    Ok(tx) => tracing::debug!(tx = %tx, "top-up confirmed"),
                    Err(error) => {
                        tracing::warn!(error = %error, "top-up unavailable, proceeding without it");
                    }
                }
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(error = %error, "balance check failed, proceeding without it");
            }
        }
    }
}
