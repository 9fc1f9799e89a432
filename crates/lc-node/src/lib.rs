//! # LightChain Node
//!
//! Wires the stores, state, networking and protocol engines into a
//! running node, and manages their lifecycle.
//!
//! - [`component`]: the start/stop contract and the manager that drives
//!   components in dependency order under a deadline.
//! - [`config`]: node configuration (store paths, demo traffic knobs).
//! - [`node`]: the ingest-node assembly.
//! - [`broadcast`]: the hello-traffic demo engine on the broadcast
//!   channel.

pub mod broadcast;
pub mod component;
pub mod config;
pub mod node;

pub use broadcast::{BroadcastEngine, HelloCollector};
pub use component::{Component, ComponentError, ComponentManager};
pub use config::NodeConfig;
pub use node::{LightChainNode, NodeError};
