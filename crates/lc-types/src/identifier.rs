//! # Identifier
//!
//! The 32-byte opaque value that names every entity, account and node in
//! LightChain. Identifiers are hash-sized: an entity's identifier is the
//! SHA3-256 digest of its canonical encoding.

use lc_crypto::Hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte, value-equal, ordered identifier.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Identifier([u8; 32]);

impl Identifier {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The all-zero identifier, used as the genesis parent.
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }
}

impl From<Hash> for Identifier {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form: first 4 bytes are enough to tell identifiers apart in logs.
        write!(f, "Identifier({}…)", hex::encode(&self.0[..4]))
    }
}
