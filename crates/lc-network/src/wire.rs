//! # Wire Frames
//!
//! The framed messages a transport moves between nodes. The in-process
//! hub routes these directly; a socket transport would serialize them
//! with the workspace codec. Ordering: per-sender FIFO within a channel,
//! nothing across channels.

use lc_types::{Entity, Identifier};
use serde::{Deserialize, Serialize};

/// One channel-scoped message from an origin node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Node that sent the frame.
    pub origin_id: Identifier,
    /// Channel the frame travels on.
    pub channel: String,
    /// The carried entity.
    pub entity: Entity,
}

/// Request to store an entity in a channel's distributed hash table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhtPutRequest {
    /// Channel whose table receives the entity.
    pub channel: String,
    /// The entity to store.
    pub entity: Entity,
}

/// Request to fetch an entity from a channel's distributed hash table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhtGetRequest {
    /// Channel whose table is queried.
    pub channel: String,
    /// Identifier of the wanted entity.
    pub identifier: Identifier,
}

/// Reply to a [`DhtGetRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhtGetReply {
    /// The entity, or `None` if the table does not hold it.
    pub entity: Option<Entity>,
}
