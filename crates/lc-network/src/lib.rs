//! # LightChain Network
//!
//! The channel-multiplexed message bus between nodes.
//!
//! A [`Network`] hands every registered engine a [`Conduit`] scoped to one
//! named channel. Exactly one engine may register per channel on a node;
//! the network delivers each inbound `(channel, entity)` to that engine's
//! `process` exactly once per send.
//!
//! [`hub::Hub`] is the in-process transport used by tests and local
//! multi-node setups: it routes [`wire::Frame`]s directly into the target
//! engine and backs the conduits' DHT operations with a shared map.

pub mod channels;
pub mod conduit;
pub mod errors;
pub mod hub;
pub mod network;
pub mod wire;

pub use conduit::Conduit;
pub use errors::NetworkError;
pub use hub::{Hub, StubNetwork};
pub use network::Network;
pub use wire::{DhtGetRequest, DhtGetReply, DhtPutRequest, Frame};
