//! # Ballot Effects
//!
//! Production implementations of the effect interfaces in `ballot-core`:
//! filesystem and in-memory storage, and the signed WebSocket RPC handler
//! for the ledger program.
//!
//! No mock handlers here; those belong in `ballot-testkit`.

pub mod ledger;
pub mod storage;

pub use ledger::{CallEnvelope, WsLedger};
pub use storage::{FilesystemStorage, MemoryStorage};
