//! # Conduit
//!
//! The networking capability handed to an engine at registration, scoped
//! to the engine's channel.

use crate::errors::NetworkError;
use lc_types::{Entity, Identifier};

/// Per-channel networking operations available to one engine.
pub trait Conduit: Send + Sync {
    /// Send the entity to the engine registered on this channel at the
    /// target node. Returns once the transport has accepted the send,
    /// which is not a delivery acknowledgement.
    fn unicast(&self, entity: &Entity, target: Identifier) -> Result<(), NetworkError>;

    /// Store the entity on the distributed hash table of this channel.
    fn put(&self, entity: &Entity) -> Result<(), NetworkError>;

    /// Fetch the entity with this identifier from the distributed hash
    /// table of this channel.
    fn get(&self, id: &Identifier) -> Result<Option<Entity>, NetworkError>;

    /// All entities stored on this channel's distributed hash table.
    fn all_entities(&self) -> Result<Vec<Entity>, NetworkError>;
}
