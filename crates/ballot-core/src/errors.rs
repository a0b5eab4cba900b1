//! Client error taxonomy.
//!
//! Every failure surfaced to a caller of the engine is one of these
//! variants. Bootstrap failures are terminal for dependent operations until
//! an explicit retry; read failures leave local state untouched; write
//! failures are surfaced only after any optimistic state has been rolled
//! back.

use thiserror::Error;

/// Result alias used throughout the client.
pub type Result<T> = std::result::Result<T, BallotError>;

/// Categorized client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BallotError {
    /// No signer or no path to the ledger; user-recoverable by connecting.
    #[error("Connection error: {message}")]
    Connection {
        /// What was missing or unreachable
        message: String,
    },

    /// The initialize call for the shared record was rejected or failed.
    #[error("Record creation failed: {message}")]
    RemoteCreation {
        /// Remote diagnostic
        message: String,
    },

    /// A create-poll call was rejected or failed.
    #[error("Poll creation failed: {message}")]
    Creation {
        /// Remote diagnostic
        message: String,
    },

    /// A vote call was rejected or failed; optimistic state has been rolled back.
    #[error("Vote failed: {message}")]
    Vote {
        /// Remote diagnostic
        message: String,
    },

    /// A read from the shared record failed; local state is unchanged.
    #[error("Fetch failed: {message}")]
    Fetch {
        /// What failed
        message: String,
    },

    /// The operation overlaps an in-flight one and was rejected, not queued.
    #[error("Busy: {message}")]
    Busy {
        /// Which resource is busy
        message: String,
    },

    /// Local persistence failed.
    #[error("Storage error: {message}")]
    Storage {
        /// What failed
        message: String,
    },

    /// Input rejected before any remote call was issued.
    #[error("Invalid: {message}")]
    Invalid {
        /// Why the input was rejected
        message: String,
    },
}

impl BallotError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a record-creation error.
    pub fn remote_creation(message: impl Into<String>) -> Self {
        Self::RemoteCreation {
            message: message.into(),
        }
    }

    /// Create a poll-creation error.
    pub fn creation(message: impl Into<String>) -> Self {
        Self::Creation {
            message: message.into(),
        }
    }

    /// Create a vote error.
    pub fn vote_rejected(message: impl Into<String>) -> Self {
        Self::Vote {
            message: message.into(),
        }
    }

    /// Create a fetch error.
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a busy error.
    pub fn busy(message: impl Into<String>) -> Self {
        Self::Busy {
            message: message.into(),
        }
    }

    /// Create a storage error.
    pub fn storage_failed(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Whether retrying is a sensible user action for this error.
    ///
    /// `Invalid` requires changed input, and `Busy` resolves on its own; the
    /// rest are candidates for an explicit retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Invalid { .. } | Self::Busy { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_by_variant() {
        assert!(BallotError::connection("no signer").is_retryable());
        assert!(BallotError::fetch_failed("timeout").is_retryable());
        assert!(!BallotError::invalid("too few options").is_retryable());
        assert!(!BallotError::busy("poll-1").is_retryable());
    }
}
