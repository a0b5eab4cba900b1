//! In-memory ledger double: the remote program as a scriptable state
//! machine with per-method call counting, failure injection, and optional
//! latency for overlap tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use ballot_core::effects::{LedgerEffects, LedgerError};
use ballot_core::identifiers::{Address, OptionId, PollId, TxRef};
use ballot_core::identity::RecordIdentity;
use ballot_core::record::{Poll, PollOption, SharedRecord, Vote};

/// Per-method call counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    /// Number of `account_exists` calls
    pub account_exists: usize,
    /// Number of `initialize_record` calls
    pub initialize_record: usize,
    /// Number of `fetch_record` calls
    pub fetch_record: usize,
    /// Number of `create_poll` calls
    pub create_poll: usize,
    /// Number of `vote` calls
    pub vote: usize,
    /// Number of `balance` calls
    pub balance: usize,
    /// Number of `request_top_up` calls
    pub request_top_up: usize,
}

#[derive(Debug)]
struct MockLedgerState {
    record: Option<SharedRecord>,
    balance: u64,
    next_poll_id: u32,
    counts: LedgerCounts,
    latency: Option<Duration>,
    fail_initialize: Option<String>,
    fail_fetch: Option<String>,
    fail_create: Option<String>,
    fail_vote: Option<String>,
    fail_top_up: Option<String>,
}

impl Default for MockLedgerState {
    fn default() -> Self {
        Self {
            record: None,
            // Plenty by default, so the pre-create top-up stays quiet
            // unless a test lowers it.
            balance: 2_000_000_000,
            next_poll_id: 1,
            counts: LedgerCounts::default(),
            latency: None,
            fail_initialize: None,
            fail_fetch: None,
            fail_create: None,
            fail_vote: None,
            fail_top_up: None,
        }
    }
}

/// Deterministic [`LedgerEffects`] double over an in-memory shared record.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    state: Arc<Mutex<MockLedgerState>>,
}

impl MockLedger {
    /// A ledger where no account exists yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger where the shared record already exists.
    pub fn with_existing_record(record: SharedRecord) -> Self {
        let ledger = Self::new();
        {
            let mut state = ledger.state.lock().unwrap();
            state.next_poll_id = record.polls.iter().map(|p| p.id.0 + 1).max().unwrap_or(1);
            state.record = Some(record);
        }
        ledger
    }

    /// Current call counts.
    pub fn counts(&self) -> LedgerCounts {
        self.state.lock().unwrap().counts
    }

    /// Snapshot of the remote record, `None` while uninitialized.
    pub fn record(&self) -> Option<SharedRecord> {
        self.state.lock().unwrap().record.clone()
    }

    /// Set the caller's balance.
    pub fn set_balance(&self, balance: u64) {
        self.state.lock().unwrap().balance = balance;
    }

    /// Current caller balance.
    pub fn balance_value(&self) -> u64 {
        self.state.lock().unwrap().balance
    }

    /// Delay every call by `latency`, for overlap tests.
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().unwrap().latency = Some(latency);
    }

    /// Close a poll remotely.
    pub fn close_poll(&self, poll_id: PollId) {
        let mut state = self.state.lock().unwrap();
        if let Some(record) = &mut state.record {
            if let Some(poll) = record.polls.iter_mut().find(|p| p.id == poll_id) {
                poll.closed = true;
            }
        }
    }

    /// Make every subsequent `initialize_record` fail.
    pub fn fail_initialize(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_initialize = Some(message.into());
    }

    /// Make every subsequent `fetch_record` fail.
    pub fn fail_fetch(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_fetch = Some(message.into());
    }

    /// Make every subsequent `create_poll` fail.
    pub fn fail_create(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_create = Some(message.into());
    }

    /// Make every subsequent `vote` fail.
    pub fn fail_vote(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_vote = Some(message.into());
    }

    /// Make every subsequent `request_top_up` fail.
    pub fn fail_top_up(&self, message: impl Into<String>) {
        self.state.lock().unwrap().fail_top_up = Some(message.into());
    }

    /// Clear all injected failures.
    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_initialize = None;
        state.fail_fetch = None;
        state.fail_create = None;
        state.fail_vote = None;
        state.fail_top_up = None;
    }

    async fn pause(&self) {
        let latency = self.state.lock().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl LedgerEffects for MockLedger {
    async fn account_exists(&self, _address: &Address) -> Result<bool, LedgerError> {
        self.state.lock().unwrap().counts.account_exists += 1;
        self.pause().await;
        Ok(self.state.lock().unwrap().record.is_some())
    }

    async fn initialize_record(&self, _record: &RecordIdentity) -> Result<TxRef, LedgerError> {
        self.state.lock().unwrap().counts.initialize_record += 1;
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.fail_initialize {
            return Err(LedgerError::Rejected(message.clone()));
        }
        if state.record.is_some() {
            return Err(LedgerError::Rejected("record already initialized".into()));
        }
        state.record = Some(SharedRecord::default());
        Ok(TxRef("tx-init".into()))
    }

    async fn fetch_record(&self, _address: &Address) -> Result<SharedRecord, LedgerError> {
        self.state.lock().unwrap().counts.fetch_record += 1;
        self.pause().await;
        let state = self.state.lock().unwrap();
        if let Some(message) = &state.fail_fetch {
            return Err(LedgerError::Rejected(message.clone()));
        }
        state
            .record
            .clone()
            .ok_or_else(|| LedgerError::Rejected("no account at address".into()))
    }

    async fn create_poll(
        &self,
        _address: &Address,
        title: &str,
        options: &[String],
    ) -> Result<TxRef, LedgerError> {
        self.state.lock().unwrap().counts.create_poll += 1;
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.fail_create {
            return Err(LedgerError::Rejected(message.clone()));
        }
        let id = PollId(state.next_poll_id);
        state.next_poll_id += 1;
        let poll = Poll {
            id,
            title: title.to_string(),
            options: options
                .iter()
                .enumerate()
                .map(|(index, text)| PollOption {
                    id: OptionId(index as u8),
                    text: text.clone(),
                })
                .collect(),
            closed: false,
        };
        let record = state
            .record
            .as_mut()
            .ok_or_else(|| LedgerError::Rejected("no account at address".into()))?;
        record.polls.push(poll);
        Ok(TxRef(format!("tx-poll-{}", id.value())))
    }

    async fn vote(
        &self,
        _address: &Address,
        poll_id: PollId,
        option: OptionId,
    ) -> Result<TxRef, LedgerError> {
        self.state.lock().unwrap().counts.vote += 1;
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.fail_vote {
            return Err(LedgerError::Rejected(message.clone()));
        }
        let record = state
            .record
            .as_mut()
            .ok_or_else(|| LedgerError::Rejected("no account at address".into()))?;
        let poll = record
            .polls
            .iter()
            .find(|p| p.id == poll_id)
            .ok_or_else(|| LedgerError::Rejected(format!("no such poll {poll_id}")))?;
        if poll.closed {
            return Err(LedgerError::Rejected(format!("{poll_id} is closed")));
        }
        if !poll.has_option(option) {
            return Err(LedgerError::Rejected(format!(
                "{option} does not belong to {poll_id}"
            )));
        }
        record.votes.push(Vote { poll_id, option });
        let n = record.votes.len();
        Ok(TxRef(format!("tx-vote-{n}")))
    }

    async fn balance(&self) -> Result<u64, LedgerError> {
        self.state.lock().unwrap().counts.balance += 1;
        Ok(self.state.lock().unwrap().balance)
    }

    async fn request_top_up(&self, amount: u64) -> Result<TxRef, LedgerError> {
        self.state.lock().unwrap().counts.request_top_up += 1;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.fail_top_up {
            return Err(LedgerError::Rejected(message.clone()));
        }
        state.balance += amount;
        Ok(TxRef("tx-topup".into()))
    }
}
