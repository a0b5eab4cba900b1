//! # Ballot Core
//!
//! Domain types and effect interfaces for the ballot client: the shared
//! record model (polls and votes), identifiers, the error taxonomy, and the
//! async traits that the synchronization engine is written against.
//!
//! This crate is deliberately free of I/O. Production effect handlers live
//! in `ballot-effects`; deterministic test doubles live in `ballot-testkit`.

pub mod config;
pub mod effects;
pub mod errors;
pub mod identifiers;
pub mod identity;
pub mod lifecycle;
pub mod record;
pub mod validation;

pub use config::ClientConfig;
pub use effects::{LedgerEffects, LedgerError, StorageEffects, StorageError};
pub use errors::{BallotError, Result};
pub use identifiers::{Address, OptionId, PollId, TxRef};
pub use identity::{LocalSigner, RecordIdentity, Signer};
pub use lifecycle::{RecordHandle, RecordPhase};
pub use record::{Poll, PollOption, SharedRecord, Vote};
