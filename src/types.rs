//! Core identifier types.
//!
//! The engine never sees human sessions or wallets; an external
//! identity/session resolver hands it opaque 32-byte addresses.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque 32-byte member/recipient address.
///
/// The all-zero address is reserved as "null" and rejected wherever a
/// real recipient is required.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an Address from a 32-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), 32, "Address must be 32 bytes");
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Self(arr)
    }

    /// Returns the raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The reserved null address (all zero bytes).
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Whether this is the reserved null address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short prefix is enough to tell members apart in logs
        write!(f, "Address({}…)", hex::encode(&self.0[..4]))
    }
}

/// Fund instance identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FundId(pub Uuid);

impl FundId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FundId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proposal identifier, sequential per fund starting at 1.
pub type ProposalId = u64;

/// Value amount. Unsigned, so negative amounts are unrepresentable;
/// the zero check covers the rest of the "positive amount" rule.
pub type Amount = u64;
