//! # Ballot Testkit
//!
//! Deterministic test doubles for the effect interfaces, plus fixtures.
//!
//! Uses blocking `std::sync::Mutex` internally: this is test
//! infrastructure running in controlled single-threaded contexts, and the
//! simpler synchronous API keeps tests clear.

// Test-layer code; lock poisoning cannot occur in these single-threaded tests.
#![allow(clippy::unwrap_used)]

pub mod fixtures;
mod mock_ledger;
mod mock_storage;

pub use mock_ledger::{LedgerCounts, MockLedger};
pub use mock_storage::{MockStorage, StorageCounts};
