//! Component lifecycle over real nodes: deadline-bounded startup, demo
//! traffic while running, reverse-ordered shutdown.

use super::support::ChainRig;
use lc_network::{Hub, Network, StubNetwork};
use lc_node::{
    BroadcastEngine, Component, ComponentError, ComponentManager, HelloCollector, LightChainNode,
    NodeConfig,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_two_node_network_starts_and_stops() {
    let rig = ChainRig::new();
    let dir_1 = tempfile::tempdir().unwrap();
    let dir_2 = tempfile::tempdir().unwrap();
    let hub = Arc::new(Hub::new());

    let network_1 = StubNetwork::new(hub.clone());
    let network_2 = StubNetwork::new(hub);
    let peers = vec![network_1.id(), network_2.id()];

    let node_1 =
        LightChainNode::build(&NodeConfig::at(dir_1.path()), &network_1, rig.genesis()).unwrap();
    let node_2 =
        LightChainNode::build(&NodeConfig::at(dir_2.path()), &network_2, rig.genesis()).unwrap();

    let collector = HelloCollector::new();
    let broadcast_1 = BroadcastEngine::register(
        &network_1,
        peers.clone(),
        collector.clone(),
        Duration::from_millis(5),
        4,
    )
    .unwrap();
    let broadcast_2 = BroadcastEngine::register(
        &network_2,
        peers,
        collector.clone(),
        Duration::from_millis(5),
        4,
    )
    .unwrap();

    let mut manager = ComponentManager::new();
    manager.add(node_1);
    manager.add(node_2);
    manager.add(broadcast_1.clone());
    manager.add(broadcast_2);

    manager.start_all(Duration::from_secs(5)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    manager.stop_all().await;

    // Four rounds each way.
    assert_eq!(collector.total_sent(), 8);
    assert_eq!(broadcast_1.total_received(), 4);
}

#[tokio::test]
async fn test_failed_component_stops_started_nodes() {
    struct Doomed;

    #[async_trait::async_trait]
    impl Component for Doomed {
        fn name(&self) -> &'static str {
            "doomed"
        }
        async fn start(&self) -> Result<(), ComponentError> {
            Err(ComponentError::StartFailed {
                name: "doomed".to_string(),
                message: "refuses to start".to_string(),
            })
        }
        async fn stop(&self) {}
    }

    let rig = ChainRig::new();
    let dir = tempfile::tempdir().unwrap();
    let network = StubNetwork::new(Arc::new(Hub::new()));
    let node =
        LightChainNode::build(&NodeConfig::at(dir.path()), &network, rig.genesis()).unwrap();

    let mut manager = ComponentManager::new();
    manager.add(node.clone());
    manager.add(Arc::new(Doomed));

    let err = manager.start_all(Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, ComponentError::StartFailed { .. }));

    // The rollback already closed the node's stores.
    assert!(node.close().is_ok());
}
