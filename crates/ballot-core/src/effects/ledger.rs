//! The ledger program's call contract.
//!
//! The remote program is an opaque external service; this trait is the
//! complete surface the client uses. Every call is asynchronous and signed
//! by the handler's caller identity; a handler is constructed around a
//! [`Signer`](crate::identity::Signer), the way the original surface bound
//! a provider to a wallet.

use async_trait::async_trait;
use thiserror::Error;

use crate::identifiers::{Address, OptionId, PollId, TxRef};
use crate::identity::RecordIdentity;
use crate::record::SharedRecord;

/// Failures at the ledger boundary, before mapping into the client taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No network path to the service
    #[error("ledger unreachable: {0}")]
    Unreachable(String),
    /// The service processed the call and rejected it
    #[error("call rejected: {0}")]
    Rejected(String),
    /// The service answered with something the client could not decode
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Signed RPC calls accepted by the ledger program.
#[async_trait]
pub trait LedgerEffects: Send + Sync {
    /// Whether an account exists at `address`.
    async fn account_exists(&self, address: &Address) -> Result<bool, LedgerError>;

    /// Initialize the shared record.
    ///
    /// Jointly signed: the handler's caller identity pays, and `record`
    /// co-signs to prove control of the address being initialized. Callers
    /// must not race multiple initialize calls for one address.
    async fn initialize_record(&self, record: &RecordIdentity) -> Result<TxRef, LedgerError>;

    /// Fetch and decode the full shared record.
    async fn fetch_record(&self, address: &Address) -> Result<SharedRecord, LedgerError>;

    /// Append a new poll. The service assigns the poll id.
    async fn create_poll(
        &self,
        address: &Address,
        title: &str,
        options: &[String],
    ) -> Result<TxRef, LedgerError>;

    /// Append a vote.
    async fn vote(
        &self,
        address: &Address,
        poll_id: PollId,
        option: OptionId,
    ) -> Result<TxRef, LedgerError>;

    /// Current balance of the caller identity, in base units.
    async fn balance(&self) -> Result<u64, LedgerError>;

    /// Request a balance top-up for the caller identity.
    ///
    /// Best-effort and environment-dependent; callers treat failure as
    /// non-fatal and proceed with the main operation.
    async fn request_top_up(&self, amount: u64) -> Result<TxRef, LedgerError>;
}
