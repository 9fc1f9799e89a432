//! # Network
//!
//! The node-side entry point of the networking layer: engines register on
//! a channel and receive their scoped [`Conduit`].

use crate::conduit::Conduit;
use crate::errors::NetworkError;
use lc_types::{Engine, Identifier};
use std::sync::Arc;

/// A node's attachment to the LightChain network.
pub trait Network: Send + Sync {
    /// Register the engine on the channel and return its conduit.
    ///
    /// Registration is exclusive per `(node, channel)`: a second
    /// registration on an occupied channel fails with
    /// [`NetworkError::ChannelOccupied`].
    fn register(
        &self,
        engine: Arc<dyn Engine>,
        channel: &str,
    ) -> Result<Box<dyn Conduit>, NetworkError>;

    /// This node's identifier on the network.
    fn id(&self) -> Identifier;
}
