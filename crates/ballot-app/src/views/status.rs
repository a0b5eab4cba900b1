//! Bootstrap status banner.
//!
//! Pure mapping from the record lifecycle to the status line a front end
//! shows above everything else. The retry action a renderer offers when
//! `can_retry` maps to the bootstrap coordinator's retry.

use ballot_core::errors::BallotError;
use ballot_core::identifiers::Address;
use ballot_core::lifecycle::RecordPhase;

/// Visual tone of the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerTone {
    /// Waiting on the user (connect a signer)
    Waiting,
    /// Work in flight
    Pending,
    /// Record ready
    Ready,
    /// Bootstrap failed
    Error,
}

/// The status line derived from bootstrap state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    /// User-facing message
    pub message: String,
    /// Visual tone
    pub tone: BannerTone,
    /// Whether a retry action should be offered
    pub can_retry: bool,
}

impl StatusBanner {
    /// Derive the banner for the current lifecycle state.
    ///
    /// `address` is shown abbreviated once ready; `error` is the last
    /// bootstrap failure, shown only in the failed phase.
    pub fn derive(
        phase: RecordPhase,
        address: Option<Address>,
        error: Option<&BallotError>,
    ) -> Self {
        match phase {
            RecordPhase::Uninitialized => Self {
                message: "Connect a signer to continue".to_string(),
                tone: BannerTone::Waiting,
                can_retry: false,
            },
            RecordPhase::Initializing => Self {
                message: "Initializing your data record...".to_string(),
                tone: BannerTone::Pending,
                can_retry: false,
            },
            RecordPhase::Ready => {
                let message = match address {
                    Some(addr) => format!("Connected! Record: {}", addr.short()),
                    None => "Connected!".to_string(),
                };
                Self {
                    message,
                    tone: BannerTone::Ready,
                    can_retry: false,
                }
            }
            RecordPhase::Failed => {
                let message = match error {
                    Some(e) => format!("Error: {e}"),
                    None => "Error: bootstrap failed".to_string(),
                };
                Self {
                    message,
                    tone: BannerTone::Error,
                    can_retry: true,
                }
            }
        }
    }
}
