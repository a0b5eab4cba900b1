//! Signing identities.
//!
//! Two identities participate in every deployment: the user's signer (a
//! wallet in the original surface, a local keypair here) and the shared
//! record's own identity, whose public key doubles as the record address.

use std::fmt;

use ed25519_dalek::{Signer as DalekSigner, SigningKey};
use rand::rngs::OsRng;

use crate::errors::{BallotError, Result};
use crate::identifiers::Address;

/// A signing capability: everything the ledger needs to authenticate a call.
///
/// Implemented by [`LocalSigner`] and [`RecordIdentity`]; a wallet
/// integration would provide its own implementation.
pub trait Signer: Send + Sync {
    /// Public address of this identity.
    fn address(&self) -> Address;

    /// Sign a message, returning the detached 64-byte signature.
    fn sign(&self, message: &[u8]) -> [u8; 64];
}

/// An in-process user identity backed by an ed25519 keypair.
#[derive(Clone)]
pub struct LocalSigner {
    key: SigningKey,
}

impl LocalSigner {
    /// Generate a fresh signer.
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Restore a signer from its 32 secret-key bytes.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(bytes),
        }
    }

    /// The 32 secret-key bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.key.to_bytes()
    }
}

impl Signer for LocalSigner {
    fn address(&self) -> Address {
        Address::from_bytes(self.key.verifying_key().to_bytes())
    }

    fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.key.sign(message).to_bytes()
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// The shared record's own identity.
///
/// The public key is the record address; the secret key co-signs the one
/// initialize call. Persisted locally as a JSON array of the 32 secret-key
/// bytes so the same record is reused across sessions.
#[derive(Clone)]
pub struct RecordIdentity {
    key: SigningKey,
}

impl RecordIdentity {
    /// Generate a fresh record identity.
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut OsRng),
        }
    }

    /// The record address derived from this identity.
    pub fn address(&self) -> Address {
        Address::from_bytes(self.key.verifying_key().to_bytes())
    }

    /// Encode for local persistence.
    pub fn to_persist_bytes(&self) -> Vec<u8> {
        // Infallible for a plain byte vector.
        serde_json::to_vec(&self.key.to_bytes().to_vec()).unwrap_or_default()
    }

    /// Decode a previously persisted identity.
    pub fn from_persist_bytes(data: &[u8]) -> Result<Self> {
        let bytes: Vec<u8> = serde_json::from_slice(data)
            .map_err(|e| BallotError::storage_failed(format!("corrupt identity blob: {e}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| BallotError::storage_failed("corrupt identity blob: wrong length"))?;
        Ok(Self {
            key: SigningKey::from_bytes(&bytes),
        })
    }
}

impl Signer for RecordIdentity {
    fn address(&self) -> Address {
        RecordIdentity::address(self)
    }

    fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.key.sign(message).to_bytes()
    }
}

impl fmt::Debug for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordIdentity")
            .field("address", &RecordIdentity::address(self))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_round_trip() {
        let identity = RecordIdentity::generate();
        let restored = RecordIdentity::from_persist_bytes(&identity.to_persist_bytes()).unwrap();
        assert_eq!(identity.address(), restored.address());
    }

    #[test]
    fn persist_rejects_garbage() {
        assert!(RecordIdentity::from_persist_bytes(b"not json").is_err());
        assert!(RecordIdentity::from_persist_bytes(b"[1,2,3]").is_err());
    }

    #[test]
    fn signatures_verify() {
        use ed25519_dalek::{Verifier, VerifyingKey};

        let signer = LocalSigner::generate();
        let sig = signer.sign(b"message");
        let key = VerifyingKey::from_bytes(signer.address().as_bytes()).unwrap();
        assert!(key
            .verify(b"message", &ed25519_dalek::Signature::from_bytes(&sig))
            .is_ok());
    }
}
