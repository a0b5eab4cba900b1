//! # Polls View State
//!
//! Local mirror of the shared record, rebuilt on each bootstrap. The poll
//! list is replaced wholesale by reads (never merged incrementally); the
//! vote cache is per poll, populated lazily on first results view and
//! replaced by each successful per-poll read.

use std::collections::HashMap;

use ballot_core::identifiers::{OptionId, PollId};
use ballot_core::record::{Poll, Vote};

/// Vote count for one option of a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTally {
    /// The option
    pub option: OptionId,
    /// Option text, cloned for renderers
    pub text: String,
    /// Number of votes for this option
    pub count: usize,
}

/// Aggregated results for one poll, derived by scanning the cached votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTally {
    /// Total cached votes for the poll
    pub total: usize,
    /// Per-option counts, in the poll's option order
    pub options: Vec<OptionTally>,
}

/// Poll collections and the per-poll vote cache.
#[derive(Debug, Clone, Default)]
pub struct PollsState {
    polls: Vec<Poll>,
    votes_by_poll: HashMap<PollId, Vec<Vote>>,
}

impl PollsState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Query Methods
    // =========================================================================

    /// All polls in remote creation order.
    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    /// Look up a poll by id.
    pub fn poll(&self, id: PollId) -> Option<&Poll> {
        self.polls.iter().find(|p| p.id == id)
    }

    /// Whether a poll with this id is known locally.
    pub fn has_poll(&self, id: PollId) -> bool {
        self.poll(id).is_some()
    }

    /// Number of known polls.
    pub fn poll_count(&self) -> usize {
        self.polls.len()
    }

    /// Cached votes for a poll, or `None` if never loaded.
    pub fn votes(&self, id: PollId) -> Option<&[Vote]> {
        self.votes_by_poll.get(&id).map(Vec::as_slice)
    }

    /// Cached votes for a poll, empty when never loaded.
    ///
    /// Results render from this while a refresh is still in flight.
    pub fn cached_votes(&self, id: PollId) -> &[Vote] {
        self.votes(id).unwrap_or(&[])
    }

    /// Aggregate cached votes for a poll into per-option counts.
    ///
    /// Returns `None` for an unknown poll. Votes referencing options the
    /// poll does not have are counted in the total but no option row.
    pub fn tally(&self, id: PollId) -> Option<PollTally> {
        let poll = self.poll(id)?;
        let votes = self.cached_votes(id);
        let options = poll
            .options
            .iter()
            .map(|option| OptionTally {
                option: option.id,
                text: option.text.clone(),
                count: votes.iter().filter(|v| v.option == option.id).count(),
            })
            .collect();
        Some(PollTally {
            total: votes.len(),
            options,
        })
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    /// Replace the poll list with a fresh remote read.
    pub fn replace_polls(&mut self, polls: Vec<Poll>) {
        self.polls = polls;
    }

    /// Replace the cached votes for one poll with a fresh remote read.
    pub fn replace_votes(&mut self, id: PollId, votes: Vec<Vote>) {
        self.votes_by_poll.insert(id, votes);
    }

    /// Append an optimistic vote before remote confirmation.
    pub fn push_vote(&mut self, vote: Vote) {
        self.votes_by_poll.entry(vote.poll_id).or_default().push(vote);
    }

    /// Roll back the most recently appended vote for a poll.
    pub fn pop_vote(&mut self, id: PollId) -> Option<Vote> {
        self.votes_by_poll.get_mut(&id).and_then(Vec::pop)
    }

    /// Drop everything; used when the record handle is invalidated.
    pub fn clear(&mut self) {
        self.polls.clear();
        self.votes_by_poll.clear();
    }
}
