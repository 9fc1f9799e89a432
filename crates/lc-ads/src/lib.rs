//! # LightChain Authenticated Data Structure
//!
//! An append-only Merkle set over entities. `put` admits an entity and
//! returns it wrapped with a membership proof; `verify` checks a proof
//! against the tree's current root in O(log n).
//!
//! ## Tree shape
//!
//! Leaves are `SHA3-256(entity id)` in insertion order. When a level has
//! an odd node count, the last hash is duplicated as its own sibling so
//! every internal node has two children. An internal node's hash is
//! `SHA3-256(left || right)`.
//!
//! Nodes live in an index-addressed arena owned by the tree: each node
//! records its children and parent as indices, which makes sibling lookup
//! O(1) without shared ownership.

pub mod proof;
pub mod tree;

pub use proof::{AuthenticatedEntity, Direction, MembershipProof, ProofStep};
pub use tree::{merkle_root_of, MerkleTree};
