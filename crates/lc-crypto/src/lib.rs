//! # LightChain Crypto
//!
//! Hashing and signature primitives shared by every subsystem.
//!
//! ## Contents
//!
//! - **Hashing**: SHA3-256, the protocol digest behind every entity
//!   identifier and Merkle node.
//! - **Signatures**: Ed25519 keys, signing and verification.
//!
//! The rest of the node treats both as black boxes: a 32-byte digest
//! function and a signature scheme.

pub mod errors;
pub mod hashing;
pub mod signatures;

pub use errors::CryptoError;
pub use hashing::{sha3_hash, sha3_hash_many, Hash, Sha3Hasher, HASH_LEN};
pub use signatures::{KeyPair, PublicKey, Signature};
