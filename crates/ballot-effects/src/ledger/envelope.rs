//! Signed call envelopes.
//!
//! Every RPC to the ledger program travels as a JSON envelope carrying one
//! or more detached ed25519 signatures over the canonical request bytes.
//! The initialize call carries two: the paying user identity and the record
//! identity proving control of the address being created.

use ballot_core::identity::Signer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One detached signature over an envelope's signing bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeSignature {
    /// Hex-encoded ed25519 public key of the signer
    pub public_key: String,
    /// Hex-encoded 64-byte signature
    pub signature: String,
}

/// A signed RPC request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEnvelope {
    /// Request id, unique per connection
    pub id: u64,
    /// Method name from the fixed call contract
    pub method: String,
    /// Method parameters
    pub params: Value,
    /// Signatures over [`CallEnvelope::signing_bytes`], in signing order
    pub signatures: Vec<EnvelopeSignature>,
}

impl CallEnvelope {
    /// Create an unsigned envelope.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
            signatures: Vec::new(),
        }
    }

    /// The canonical bytes every signature covers: id, method, and the
    /// params serialized with sorted keys, newline-separated.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let params = serde_json::to_string(&self.params).unwrap_or_default();
        format!("{}\n{}\n{}", self.id, self.method, params).into_bytes()
    }

    /// Append a signature from `signer`.
    pub fn sign_with(&mut self, signer: &dyn Signer) {
        let bytes = self.signing_bytes();
        self.signatures.push(EnvelopeSignature {
            public_key: signer.address().to_string(),
            signature: hex::encode(signer.sign(&bytes)),
        });
    }

    /// Verify every attached signature.
    pub fn verify(&self) -> bool {
        use ed25519_dalek::{Signature, Verifier, VerifyingKey};

        let bytes = self.signing_bytes();
        !self.signatures.is_empty()
            && self.signatures.iter().all(|entry| {
                let Ok(key_bytes) = hex::decode(&entry.public_key) else {
                    return false;
                };
                let Ok(key_bytes) = <[u8; 32]>::try_from(key_bytes) else {
                    return false;
                };
                let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
                    return false;
                };
                let Ok(sig_bytes) = hex::decode(&entry.signature) else {
                    return false;
                };
                let Ok(sig_bytes) = <[u8; 64]>::try_from(sig_bytes) else {
                    return false;
                };
                key.verify(&bytes, &Signature::from_bytes(&sig_bytes)).is_ok()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_core::LocalSigner;
    use serde_json::json;

    #[test]
    fn single_signature_verifies() {
        let signer = LocalSigner::generate();
        let mut envelope = CallEnvelope::new(1, "vote", json!({ "poll_id": 3, "option": 1 }));
        envelope.sign_with(&signer);
        assert!(envelope.verify());
    }

    #[test]
    fn joint_signatures_verify() {
        let signer = LocalSigner::generate();
        let record = ballot_core::RecordIdentity::generate();
        let mut envelope = CallEnvelope::new(2, "initialize_record", json!({}));
        envelope.sign_with(&signer);
        envelope.sign_with(&record);
        assert_eq!(envelope.signatures.len(), 2);
        assert!(envelope.verify());
    }

    #[test]
    fn tampered_params_fail_verification() {
        let signer = LocalSigner::generate();
        let mut envelope = CallEnvelope::new(3, "vote", json!({ "option": 1 }));
        envelope.sign_with(&signer);
        envelope.params = json!({ "option": 2 });
        assert!(!envelope.verify());
    }

    #[test]
    fn unsigned_envelope_does_not_verify() {
        let envelope = CallEnvelope::new(4, "balance", json!({}));
        assert!(!envelope.verify());
    }
}
