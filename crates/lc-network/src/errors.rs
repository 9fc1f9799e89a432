//! Networking error types.

use lc_types::Identifier;
use thiserror::Error;

/// Errors raised by the networking layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Another engine is already registered on this channel at this node.
    #[error("channel {channel} already has a registered engine")]
    ChannelOccupied { channel: String },

    /// No engine is registered for the target node on this channel.
    #[error("no engine on channel {channel} at node {target}")]
    TargetNotFound {
        target: Identifier,
        channel: String,
    },

    /// The target engine rejected the delivered entity.
    #[error("delivery on channel {channel} to {target} failed: {message}")]
    DeliveryFailed {
        target: Identifier,
        channel: String,
        message: String,
    },

    /// A distributed-storage (DHT) operation failed.
    #[error("distributed storage failure: {message}")]
    DistributedStorage { message: String },
}
