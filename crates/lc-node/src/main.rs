//! Local two-node demo: wires two ingest nodes onto an in-process hub
//! and lets their broadcast engines exchange hello traffic until
//! interrupted.

use lc_node::{BroadcastEngine, ComponentManager, HelloCollector, LightChainNode, NodeConfig};
use lc_network::{Hub, Network, StubNetwork};
use lc_state::{Snapshot, TableSnapshot};
use lc_types::fixtures;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const START_DEADLINE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let hub = Arc::new(Hub::new());
    let network_1 = StubNetwork::new(hub.clone());
    let network_2 = StubNetwork::new(hub);
    let peers = vec![network_1.id(), network_2.id()];

    // Both nodes agree on the same genesis snapshot.
    let genesis: Arc<dyn Snapshot> =
        Arc::new(TableSnapshot::new(fixtures::identifier_fixture(), 0));

    let node_1 = LightChainNode::build(
        &NodeConfig::at("lightchain-data/node-1"),
        &network_1,
        genesis.clone(),
    )?;
    let node_2 = LightChainNode::build(
        &NodeConfig::at("lightchain-data/node-2"),
        &network_2,
        genesis,
    )?;

    let collector = HelloCollector::new();
    let config = NodeConfig::default();
    let broadcast_1 = BroadcastEngine::register(
        &network_1,
        peers.clone(),
        collector.clone(),
        config.broadcast_interval,
        config.broadcast_rounds,
    )?;
    let broadcast_2 = BroadcastEngine::register(
        &network_2,
        peers,
        collector.clone(),
        config.broadcast_interval,
        config.broadcast_rounds,
    )?;

    let mut manager = ComponentManager::new();
    manager.add(node_1);
    manager.add(node_2);
    manager.add(broadcast_1);
    manager.add(broadcast_2);
    manager.start_all(START_DEADLINE).await?;
    info!("demo network running; ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    manager.stop_all().await;
    info!(
        sent = collector.total_sent(),
        received = collector.total_received(),
        "demo network stopped"
    );
    Ok(())
}
