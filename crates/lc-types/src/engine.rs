//! # Engine Contract
//!
//! The interface the network delivers inbound entities to. One engine
//! registers per channel; the network invokes [`Engine::process`] once per
//! delivered entity, possibly from many threads at once.

use crate::entities::EntityKind;
use crate::identifier::Identifier;
use thiserror::Error;

/// A protocol engine fed by the network.
///
/// Implementations must be internally race-free: `process` is invoked
/// concurrently for independent entities.
pub trait Engine: Send + Sync {
    /// Handle an entity arriving on this engine's channel.
    fn process(&self, entity: crate::entities::Entity) -> Result<(), ProcessError>;
}

/// Errors an engine surfaces to its caller.
///
/// Validation failures are deliberately absent: an entity that fails
/// certificate verification is discarded silently (and logged), not
/// surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// The entity kind is not accepted by this engine.
    #[error("entity kind {kind:?} is not accepted by this engine")]
    UnsupportedEntity { kind: EntityKind },

    /// No snapshot is known for the referenced block.
    #[error("no snapshot for reference block {block_id}")]
    UnknownReference { block_id: Identifier },

    /// A persistent store failed mid-operation. Fatal: the caller must not
    /// continue as cross-index invariants may no longer be restorable.
    #[error("store failure: {0}")]
    Store(String),
}
