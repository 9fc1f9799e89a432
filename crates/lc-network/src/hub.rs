//! # In-Process Hub
//!
//! The test-and-local transport: a registry `(node, channel) -> engine`
//! shared by any number of [`StubNetwork`]s. `unicast` routes a frame
//! directly into the target engine's `process` on the caller's thread, so
//! a send observes its own delivery. The hub also carries the per-channel
//! distributed hash table the conduits' `put`/`get` operate on.

use crate::conduit::Conduit;
use crate::errors::NetworkError;
use crate::network::Network;
use crate::wire::{DhtGetReply, DhtGetRequest, DhtPutRequest, Frame};
use lc_types::{Engine, Entity, Identifier};
use parking_lot::RwLock;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Shared in-process multiplexer between stub networks.
#[derive(Default)]
pub struct Hub {
    engines: RwLock<HashMap<(Identifier, String), Arc<dyn Engine>>>,
    dht: RwLock<HashMap<(String, Identifier), Entity>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the engine for `(node, channel)`. Fails if the slot is
    /// taken.
    fn register(
        &self,
        node: Identifier,
        channel: &str,
        engine: Arc<dyn Engine>,
    ) -> Result<(), NetworkError> {
        let mut engines = self.engines.write();
        let key = (node, channel.to_string());
        if engines.contains_key(&key) {
            return Err(NetworkError::ChannelOccupied {
                channel: channel.to_string(),
            });
        }
        engines.insert(key, engine);
        Ok(())
    }

    /// Deliver a frame to the engine registered on its channel at the
    /// target node. Exactly one `process` invocation per accepted frame.
    fn route(&self, frame: Frame, target: Identifier) -> Result<(), NetworkError> {
        // Clone the engine handle out of the registry so `process` runs
        // without holding the hub lock; an engine is free to unicast
        // from inside `process`.
        let engine = {
            let engines = self.engines.read();
            engines.get(&(target, frame.channel.clone())).cloned()
        };
        let Some(engine) = engine else {
            return Err(NetworkError::TargetNotFound {
                target,
                channel: frame.channel,
            });
        };

        debug!(
            channel = %frame.channel,
            origin = %frame.origin_id,
            target = %target,
            "routing frame"
        );
        let channel = frame.channel;
        engine
            .process(frame.entity)
            .map_err(|err| NetworkError::DeliveryFailed {
                target,
                channel,
                message: err.to_string(),
            })
    }

    fn dht_put(&self, request: DhtPutRequest) {
        let id = request.entity.id();
        self.dht
            .write()
            .insert((request.channel, id), request.entity);
    }

    fn dht_get(&self, request: DhtGetRequest) -> DhtGetReply {
        let entity = self
            .dht
            .read()
            .get(&(request.channel, request.identifier))
            .cloned();
        DhtGetReply { entity }
    }

    fn dht_all(&self, channel: &str) -> Vec<Entity> {
        self.dht
            .read()
            .iter()
            .filter(|((c, _), _)| c == channel)
            .map(|(_, entity)| entity.clone())
            .collect()
    }
}

/// A node's attachment to an in-process [`Hub`].
pub struct StubNetwork {
    hub: Arc<Hub>,
    id: Identifier,
}

impl StubNetwork {
    /// Attach a new node with a random identifier to the hub.
    pub fn new(hub: Arc<Hub>) -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            hub,
            id: Identifier::from_bytes(bytes),
        }
    }
}

impl Network for StubNetwork {
    fn register(
        &self,
        engine: Arc<dyn Engine>,
        channel: &str,
    ) -> Result<Box<dyn Conduit>, NetworkError> {
        self.hub.register(self.id, channel, engine)?;
        Ok(Box::new(StubConduit {
            hub: self.hub.clone(),
            origin: self.id,
            channel: channel.to_string(),
        }))
    }

    fn id(&self) -> Identifier {
        self.id
    }
}

/// Channel-scoped conduit over the hub.
struct StubConduit {
    hub: Arc<Hub>,
    origin: Identifier,
    channel: String,
}

impl Conduit for StubConduit {
    fn unicast(&self, entity: &Entity, target: Identifier) -> Result<(), NetworkError> {
        let frame = Frame {
            origin_id: self.origin,
            channel: self.channel.clone(),
            entity: entity.clone(),
        };
        self.hub.route(frame, target)
    }

    fn put(&self, entity: &Entity) -> Result<(), NetworkError> {
        self.hub.dht_put(DhtPutRequest {
            channel: self.channel.clone(),
            entity: entity.clone(),
        });
        Ok(())
    }

    fn get(&self, id: &Identifier) -> Result<Option<Entity>, NetworkError> {
        let reply = self.hub.dht_get(DhtGetRequest {
            channel: self.channel.clone(),
            identifier: *id,
        });
        Ok(reply.entity)
    }

    fn all_entities(&self) -> Result<Vec<Entity>, NetworkError> {
        Ok(self.hub.dht_all(&self.channel))
    }
}
