//! Ledger RPC transport.

mod envelope;
mod ws;

pub use envelope::{CallEnvelope, EnvelopeSignature};
pub use ws::WsLedger;
