//! Client configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{BallotError, Result};

/// Balance floor below which a top-up is requested before creating a poll,
/// in base units.
pub const DEFAULT_MIN_BALANCE: u64 = 100_000_000;
/// Amount requested from the top-up facility, in base units.
pub const DEFAULT_TOP_UP_AMOUNT: u64 = 2_000_000_000;
/// User-visible confirmation pause after a successful vote, before the
/// automatic switch to results.
pub const DEFAULT_CONFIRM_DELAY_MS: u64 = 1_000;

/// Tunable client settings, loadable from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket endpoint of the ledger RPC service
    pub rpc_url: String,
    /// Directory for persisted local state (the record identity)
    pub storage_dir: PathBuf,
    /// Balance floor for the pre-create top-up check
    pub min_balance: u64,
    /// Top-up amount requested when below the floor
    pub top_up_amount: u64,
    /// Vote-confirmed pause before switching to results
    pub confirm_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let storage_dir = dirs::data_dir()
            .map(|d| d.join("ballot"))
            .unwrap_or_else(|| PathBuf::from("./ballot-data"));
        Self {
            rpc_url: "ws://127.0.0.1:8900".to_string(),
            storage_dir,
            min_balance: DEFAULT_MIN_BALANCE,
            top_up_amount: DEFAULT_TOP_UP_AMOUNT,
            confirm_delay_ms: DEFAULT_CONFIRM_DELAY_MS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| BallotError::invalid(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| BallotError::invalid(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() {
            return Err(BallotError::invalid("rpc_url must not be empty"));
        }
        if self.top_up_amount < self.min_balance {
            return Err(BallotError::invalid(
                "top_up_amount must be at least min_balance",
            ));
        }
        Ok(())
    }
}
