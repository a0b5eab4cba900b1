//! Shared record lifecycle.
//!
//! The record handle is an explicitly passed value, not ambient state:
//! every engine entry point receives one and checks it against the
//! coordinator's current epoch, so completions that straddle a disconnect
//! are dropped instead of applied.

use std::fmt;

use crate::identifiers::Address;

/// Readiness of the shared record, as seen by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPhase {
    /// No signer connected, or never bootstrapped
    #[default]
    Uninitialized,
    /// A bootstrap attempt is in flight
    Initializing,
    /// The record exists remotely and reads/writes may proceed
    Ready,
    /// The last bootstrap attempt failed; explicit retry required
    Failed,
}

impl RecordPhase {
    /// Whether dependent operations may proceed.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for RecordPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A ready shared record, scoped to one bootstrap epoch.
///
/// Invalidated, not destroyed, when the signer disconnects: the remote
/// record persists, only local readiness resets. A handle from a previous
/// epoch is refused by every engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHandle {
    address: Address,
    epoch: u64,
}

impl RecordHandle {
    /// Create a handle for `address` under a bootstrap epoch.
    pub fn new(address: Address, epoch: u64) -> Self {
        Self { address, epoch }
    }

    /// The shared record's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The bootstrap epoch this handle belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
