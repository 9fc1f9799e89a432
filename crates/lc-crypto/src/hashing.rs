//! # SHA3-256 Hashing
//!
//! The protocol hash function. Every entity identifier, Merkle leaf and
//! internal Merkle node is a SHA3-256 digest.

use sha3::{Digest, Sha3_256};

/// Length of a protocol digest in bytes.
pub const HASH_LEN: usize = 32;

/// SHA3-256 hash output (256-bit).
pub type Hash = [u8; HASH_LEN];

/// Stateful SHA3-256 hasher.
pub struct Sha3Hasher {
    inner: Sha3_256,
}

impl Sha3Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha3_256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        self.inner.finalize().into()
    }
}

impl Default for Sha3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with SHA3-256 (one-shot).
pub fn sha3_hash(data: &[u8]) -> Hash {
    Sha3_256::digest(data).into()
}

/// Hash multiple inputs as one concatenated message.
pub fn sha3_hash_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Sha3Hasher::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize()
}
