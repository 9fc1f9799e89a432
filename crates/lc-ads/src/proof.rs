//! # Membership Proofs
//!
//! A proof is the ordered list of sibling hashes on the path from a leaf
//! to the root, each tagged with the side that sibling occupies at its
//! level, plus the root the proof was generated against.

use lc_crypto::{sha3_hash_many, Hash};
use lc_types::Entity;
use serde::{Deserialize, Serialize};

/// Which side of its parent a sibling node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// One step of a proof path: a sibling hash and its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Hash of the sibling node at this level.
    pub sibling: Hash,
    /// Side the sibling occupies.
    pub direction: Direction,
}

/// A Merkle membership proof.
///
/// Proofs are positional snapshots: a proof generated before a later
/// insertion keeps verifying against its captured root, but no longer
/// against the tree's current root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipProof {
    path: Vec<ProofStep>,
    root: Hash,
}

impl MembershipProof {
    pub(crate) fn new(path: Vec<ProofStep>, root: Hash) -> Self {
        Self { path, root }
    }

    /// The root this proof was generated against.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// The sibling path from leaf level to just below the root.
    pub fn path(&self) -> &[ProofStep] {
        &self.path
    }

    /// Fold the candidate leaf hash up the sibling path and return the
    /// resulting root.
    pub fn recompute_root(&self, leaf: Hash) -> Hash {
        let mut current = leaf;
        for step in &self.path {
            current = match step.direction {
                Direction::Left => sha3_hash_many(&[&step.sibling, &current]),
                Direction::Right => sha3_hash_many(&[&current, &step.sibling]),
            };
        }
        current
    }

    /// Whether the candidate leaf hash reproduces the captured root.
    pub fn holds_for(&self, leaf: Hash) -> bool {
        self.recompute_root(leaf) == self.root
    }
}

/// An entity together with its membership proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedEntity {
    /// Proof of membership at generation time.
    pub proof: MembershipProof,
    /// The entity itself.
    pub entity: Entity,
}
