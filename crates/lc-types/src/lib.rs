//! # LightChain Types
//!
//! Domain entities shared across every subsystem of the node.
//!
//! ## Contents
//!
//! - **Identifier**: the 32-byte value that names every entity and account.
//! - **Entities**: the tagged sum type flowing over the network:
//!   transactions, validated transactions, block proposals, blocks, and
//!   demo hello traffic.
//! - **Engine**: the contract the network delivers entities to.
//! - **Params**: protocol constants.
//! - **Fixtures**: reusable random-entity builders for tests.

pub mod engine;
pub mod entities;
pub mod fixtures;
pub mod identifier;
pub mod params;

pub use engine::{Engine, ProcessError};
pub use entities::{
    Account, Block, BlockHeader, BlockPayload, BlockProposal, Certificate, Entity, EntityKind,
    HelloMessage, PublicKeyBytes, SignatureBytes, Transaction, ValidatedTransaction,
};
pub use identifier::Identifier;
