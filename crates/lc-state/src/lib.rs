//! # LightChain State
//!
//! Immutable per-block views of the account table and the deterministic
//! validator assignment computed over them.
//!
//! - [`Snapshot`]: the account table as of one committed block.
//! - [`State`]: snapshot lookup by block identifier, plus the latest one.
//! - [`ValidatorAssigner`]: deterministic selection of K staked accounts
//!   for a given entity; every honest node derives the same assignment
//!   from the same snapshot.

pub mod assigner;
pub mod errors;
pub mod snapshot;
pub mod state;

pub use assigner::{Assignment, StakeAssigner, ValidatorAssigner};
pub use errors::AssignerError;
pub use snapshot::{Snapshot, TableSnapshot};
pub use state::{State, TableState};
