//! # Arena Merkle Tree
//!
//! The append-only Merkle set. Each insertion appends a leaf and rebuilds
//! the internal levels; proofs read the arena without mutation.

use crate::proof::{AuthenticatedEntity, Direction, MembershipProof, ProofStep};
use lc_crypto::{sha3_hash, sha3_hash_many, Hash};
use lc_types::{Entity, Identifier};
use std::collections::HashMap;

/// Root of a tree with no leaves.
const EMPTY_ROOT: Hash = [0u8; 32];

/// A node in the arena. Children and parent are arena indices.
#[derive(Debug, Clone)]
struct MerkleNode {
    hash: Hash,
    left: Option<usize>,
    right: Option<usize>,
    parent: Option<usize>,
    direction: Direction,
}

impl MerkleNode {
    fn leaf(hash: Hash) -> Self {
        Self {
            hash,
            left: None,
            right: None,
            parent: None,
            direction: Direction::Left,
        }
    }
}

/// Append-only Merkle set over entity identifiers.
#[derive(Debug, Default)]
pub struct MerkleTree {
    /// Leaf hashes in insertion order; the arena is rebuilt from these.
    leaf_hashes: Vec<Hash>,
    /// Leaf hash -> position in `leaf_hashes` (and in the arena).
    leaf_positions: HashMap<Hash, usize>,
    /// Node arena: leaves first, then internal levels bottom-up.
    nodes: Vec<MerkleNode>,
    root: Hash,
}

impl MerkleTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            leaf_hashes: Vec::new(),
            leaf_positions: HashMap::new(),
            nodes: Vec::new(),
            root: EMPTY_ROOT,
        }
    }

    /// Number of distinct entities in the set.
    pub fn size(&self) -> usize {
        self.leaf_hashes.len()
    }

    /// Current root hash.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Admit an entity and return it with a proof against the resulting
    /// root. Idempotent: re-putting an already-present entity changes
    /// nothing and returns a proof against the current root.
    pub fn put(&mut self, entity: &Entity) -> AuthenticatedEntity {
        let leaf = sha3_hash(entity.id().as_bytes());
        if !self.leaf_positions.contains_key(&leaf) {
            self.leaf_positions.insert(leaf, self.leaf_hashes.len());
            self.leaf_hashes.push(leaf);
            self.rebuild();
        }
        AuthenticatedEntity {
            proof: self.proof_for(leaf),
            entity: entity.clone(),
        }
    }

    /// The entity's current authenticated form, or `None` if absent.
    pub fn get(&self, entity: &Entity) -> Option<AuthenticatedEntity> {
        let leaf = sha3_hash(entity.id().as_bytes());
        if !self.leaf_positions.contains_key(&leaf) {
            return None;
        }
        Some(AuthenticatedEntity {
            proof: self.proof_for(leaf),
            entity: entity.clone(),
        })
    }

    /// Verify an authenticated entity against the tree's current root:
    /// the proof path must reproduce its captured root, and that root must
    /// be the current one.
    pub fn verify(&self, authenticated: &AuthenticatedEntity) -> bool {
        let leaf = sha3_hash(authenticated.entity.id().as_bytes());
        authenticated.proof.holds_for(leaf) && authenticated.proof.root() == self.root
    }

    fn proof_for(&self, leaf: Hash) -> MembershipProof {
        let mut path = Vec::new();
        // Present by construction at both call sites; an absent leaf
        // yields the empty path, which only verifies for a one-leaf tree.
        if let Some(&position) = self.leaf_positions.get(&leaf) {
            let mut index = position;
            while let Some(parent) = self.nodes[index].parent {
                let node = &self.nodes[parent];
                let sibling = match node.left {
                    Some(left) if left != index => left,
                    _ => match node.right {
                        Some(right) => right,
                        None => break,
                    },
                };
                path.push(ProofStep {
                    sibling: self.nodes[sibling].hash,
                    direction: self.nodes[sibling].direction,
                });
                index = parent;
            }
        }
        MembershipProof::new(path, self.root)
    }

    /// Rebuild the arena from the leaf hashes, pairing nodes level by
    /// level and duplicating the last hash of any odd-sized level.
    fn rebuild(&mut self) {
        self.nodes.clear();
        if self.leaf_hashes.is_empty() {
            self.root = EMPTY_ROOT;
            return;
        }

        self.nodes
            .extend(self.leaf_hashes.iter().map(|hash| MerkleNode::leaf(*hash)));
        let mut level: Vec<usize> = (0..self.nodes.len()).collect();

        while level.len() > 1 {
            let mut next_level = Vec::with_capacity(level.len().div_ceil(2));
            let mut cursor = 0;
            while cursor < level.len() {
                let left = level[cursor];
                let right = if cursor + 1 < level.len() {
                    level[cursor + 1]
                } else {
                    // Odd node out: its own hash becomes its sibling.
                    let duplicate = MerkleNode::leaf(self.nodes[left].hash);
                    self.nodes.push(duplicate);
                    self.nodes.len() - 1
                };

                self.nodes[left].direction = Direction::Left;
                self.nodes[right].direction = Direction::Right;

                let parent_hash =
                    sha3_hash_many(&[&self.nodes[left].hash, &self.nodes[right].hash]);
                let parent = self.nodes.len();
                self.nodes.push(MerkleNode {
                    hash: parent_hash,
                    left: Some(left),
                    right: Some(right),
                    parent: None,
                    direction: Direction::Left,
                });
                self.nodes[left].parent = Some(parent);
                self.nodes[right].parent = Some(parent);
                next_level.push(parent);

                cursor += 2;
            }
            level = next_level;
        }

        self.root = self.nodes[level[0]].hash;
    }
}

/// Merkle root over a list of identifiers, used for block payload roots.
///
/// Same shape as the tree: leaves are `SHA3-256(id)`, odd levels duplicate
/// their last hash. An empty list maps to the all-zero root.
pub fn merkle_root_of(ids: &[Identifier]) -> Identifier {
    if ids.is_empty() {
        return Identifier::from_bytes(EMPTY_ROOT);
    }
    let mut level: Vec<Hash> = ids.iter().map(|id| sha3_hash(id.as_bytes())).collect();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let left = pair[0];
            let right = if pair.len() == 2 { pair[1] } else { pair[0] };
            next.push(sha3_hash_many(&[&left, &right]));
        }
        level = next;
    }
    Identifier::from_bytes(level[0])
}
