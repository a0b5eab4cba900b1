//! Identifier newtypes shared across the client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Poll identifier, assigned by the ledger program on creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PollId(pub u32);

impl PollId {
    /// Get the raw numeric id.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "poll-{}", self.0)
    }
}

impl From<u32> for PollId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Option identifier, unique within its poll.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct OptionId(pub u8);

impl OptionId {
    /// Get the raw numeric id.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option-{}", self.0)
    }
}

impl From<u8> for OptionId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// A 32-byte ed25519 public key identifying an account on the ledger.
///
/// Used both for the shared record's address and for user identities.
/// Serialized as lowercase hex on the wire and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    /// Create an address from raw public key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Abbreviated form for status lines: first eight and last four hex chars.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..8], &full[full.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Errors produced when parsing an [`Address`] from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address: {0}")]
pub struct ParseAddressError(String);

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| ParseAddressError(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ParseAddressError("expected 32 bytes".into()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Opaque reference to a confirmed ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxRef(pub String);

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_hex_round_trip() {
        let addr = Address::from_bytes([7u8; 32]);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn address_short_form() {
        let addr = Address::from_bytes([0xab; 32]);
        assert_eq!(addr.short(), "abababab...abab");
    }

    #[test]
    fn address_rejects_wrong_length() {
        assert!("abcd".parse::<Address>().is_err());
        assert!("zz".repeat(32).parse::<Address>().is_err());
    }
}
