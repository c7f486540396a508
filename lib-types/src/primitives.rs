//! Canonical Primitive Types for the Sonad ledger
//!
//! These types are the foundational building blocks for every ledger record.
//! They are designed to be:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable
//! - Efficient to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypeError;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Block height at which a call executes
pub type BlockHeight = u64;

/// Seconds since the Unix epoch, as observed by the calling environment
pub type Timestamp = u64;

/// Fixed-point amounts with 18 fractional digits
pub type Amount = u128;

/// Sequential post identifier (first post is 1, never reused)
pub type PostId = u64;

/// Sequential reward token identifier
pub type NftId = u64;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 32-byte account address (derived from a public key)
///
/// The all-zero address is the null identity: it never owns anything and a
/// renounced owner is represented by it.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The null identity
    pub const NULL: Self = Self([0u8; 32]);

    /// Create a new Address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed Address
    pub const fn zero() -> Self {
        Self::NULL
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the null identity
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a hex address, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::InvalidLength { expected: 32, actual: bytes.len() })?;
        Ok(Self(array))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_basics() {
        let addr = Address::new([3u8; 32]);
        assert!(!addr.is_zero());
        assert_eq!(addr.as_bytes(), &[3u8; 32]);
        assert!(Address::zero().is_zero());
        assert_eq!(Address::NULL, Address::default());
    }

    #[test]
    fn test_address_hex_roundtrip() {
        let addr = Address::new([0xab; 32]);
        let printed = addr.to_string();
        assert!(printed.starts_with("0x"));
        assert_eq!(printed.parse::<Address>().unwrap(), addr);

        // Prefix is optional
        let bare = hex::encode([0xab; 32]);
        assert_eq!(Address::from_hex(&bare).unwrap(), addr);
    }

    #[test]
    fn test_address_rejects_malformed() {
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert_eq!(
            Address::from_hex("0x0102"),
            Err(TypeError::InvalidLength { expected: 32, actual: 2 })
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let addr = Address::new([42u8; 32]);
        let serialized = bincode::serialize(&addr).unwrap();
        let deserialized: Address = bincode::deserialize(&serialized).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_from_array() {
        let bytes = [5u8; 32];
        let addr: Address = bytes.into();
        assert_eq!(addr.0, bytes);
    }
}
