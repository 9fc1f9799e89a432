//! # Broadcast Engine
//!
//! The demo engine on the broadcast channel: counts distinct hello
//! entities it receives and periodically sends its own hellos to every
//! known peer. Used by the local demo and the lifecycle tests.

use crate::component::{Component, ComponentError};
use async_trait::async_trait;
use lc_network::{channels, Conduit, Network, NetworkError};
use lc_types::{Engine, Entity, HelloMessage, Identifier, ProcessError};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Explicit counters for the demo run, injected at construction.
#[derive(Debug, Default)]
pub struct HelloCollector {
    sent: AtomicU64,
    received: AtomicU64,
}

impl HelloCollector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Total hello messages sent by the engines sharing this collector.
    pub fn total_sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Total hello messages received.
    pub fn total_received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    fn on_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    fn on_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }
}

/// Shared half of the broadcast engine: the registered receiver and the
/// sending state the periodic task drives.
///
/// Registration hands the network an engine before a conduit exists, so
/// the conduit slot is filled right after registering.
struct BroadcastInner {
    node_id: Identifier,
    peers: Vec<Identifier>,
    received_ids: RwLock<HashSet<Identifier>>,
    conduit: RwLock<Option<Box<dyn Conduit>>>,
    collector: Arc<HelloCollector>,
}

impl BroadcastInner {
    fn send_round(&self, round: usize) {
        let conduit = self.conduit.read();
        let Some(conduit) = conduit.as_ref() else {
            return;
        };
        for peer in &self.peers {
            if *peer == self.node_id {
                continue;
            }
            let hello = HelloMessage {
                sender_id: self.node_id,
                content: format!("hello #{round} from {}", self.node_id),
            };
            match conduit.unicast(&Entity::Hello(hello), *peer) {
                Ok(()) => self.collector.on_sent(),
                Err(err) => warn!(peer = %peer, error = %err, "could not send hello"),
            }
        }
    }
}

impl Engine for BroadcastInner {
    fn process(&self, entity: Entity) -> Result<(), ProcessError> {
        let Entity::Hello(hello) = entity else {
            return Err(ProcessError::UnsupportedEntity {
                kind: entity.kind(),
            });
        };
        let fresh = self.received_ids.write().insert(hello.id());
        if fresh {
            self.collector.on_received();
        }
        info!(
            sender = %hello.sender_id,
            content = %hello.content,
            "received hello message"
        );
        Ok(())
    }
}

/// Demo engine exchanging hello traffic on the broadcast channel.
pub struct BroadcastEngine {
    inner: Arc<BroadcastInner>,
    interval: Duration,
    rounds: usize,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl BroadcastEngine {
    /// Register a broadcast engine on the network's broadcast channel.
    pub fn register(
        network: &dyn Network,
        peers: Vec<Identifier>,
        collector: Arc<HelloCollector>,
        interval: Duration,
        rounds: usize,
    ) -> Result<Arc<Self>, NetworkError> {
        let inner = Arc::new(BroadcastInner {
            node_id: network.id(),
            peers,
            received_ids: RwLock::new(HashSet::new()),
            conduit: RwLock::new(None),
            collector,
        });
        let conduit = network.register(inner.clone(), channels::BROADCAST)?;
        *inner.conduit.write() = Some(conduit);

        let (shutdown, _) = watch::channel(false);
        Ok(Arc::new(Self {
            inner,
            interval,
            rounds,
            shutdown,
            task: Mutex::new(None),
        }))
    }

    /// Distinct hello entities received so far.
    pub fn total_received(&self) -> usize {
        self.inner.received_ids.read().len()
    }
}

#[async_trait]
impl Component for BroadcastEngine {
    fn name(&self) -> &'static str {
        "broadcast-engine"
    }

    async fn start(&self) -> Result<(), ComponentError> {
        let inner = self.inner.clone();
        let mut shutdown_rx = self.shutdown.subscribe();
        let interval = self.interval;
        let rounds = self.rounds;

        // Periodic hello rounds; the shutdown signal cancels between
        // ticks.
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            for round in 0..rounds {
                tokio::select! {
                    _ = ticker.tick() => inner.send_round(round),
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            return;
                        }
                    }
                }
            }
        });
        *self.task.lock() = Some(handle);
        Ok(())
    }

    async fn stop(&self) {
        let _ = self.shutdown.send(true);
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            // The loop observes the signal at its next select point; the
            // abort covers a task parked mid-tick.
            handle.abort();
            let _ = handle.await;
        }
    }
}
