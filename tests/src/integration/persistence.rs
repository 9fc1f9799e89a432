//! Durability across restarts: a node's committed blocks, transaction
//! ids and seen-entity set survive a close-and-reopen of its data
//! directory.

use super::support::ChainRig;
use lc_network::{channels, Hub, Network, StubNetwork};
use lc_node::{LightChainNode, NodeConfig};
use lc_storage::{Blocks, FileIdentifiers, Identifiers};
use lc_types::{Engine, Entity};
use std::sync::Arc;

#[test]
fn test_committed_state_survives_restart() {
    let rig = ChainRig::new();
    let dir = tempfile::tempdir().unwrap();
    let config = NodeConfig::at(dir.path());
    let block = rig.block(3);

    {
        let network = StubNetwork::new(Arc::new(Hub::new()));
        let node = LightChainNode::build(&config, &network, rig.genesis()).unwrap();
        node.state().put(rig.tip());

        node.engine()
            .process(Entity::Block(block.clone()))
            .unwrap();
        node.close().unwrap();
    }

    // Reopen over the same data directory on a fresh network.
    let network = StubNetwork::new(Arc::new(Hub::new()));
    let node = LightChainNode::build(&config, &network, rig.genesis()).unwrap();

    assert!(node.blocks().has(&block.id()).unwrap());
    assert_eq!(node.blocks().at_height(2).unwrap(), Some(block.clone()));

    // The seen set survived too: a redelivery is a silent no-op and the
    // store still holds exactly one block.
    node.state().put(rig.tip());
    node.engine().process(Entity::Block(block)).unwrap();
    assert_eq!(node.blocks().all().unwrap().len(), 1);
}

#[test]
fn test_transaction_ids_survive_restart() {
    let rig = ChainRig::new();
    let dir = tempfile::tempdir().unwrap();
    let config = NodeConfig::at(dir.path());
    let block = rig.block(2);

    {
        let network = StubNetwork::new(Arc::new(Hub::new()));
        let node = LightChainNode::build(&config, &network, rig.genesis()).unwrap();
        node.state().put(rig.tip());
        node.engine()
            .process(Entity::Block(block.clone()))
            .unwrap();
        node.close().unwrap();
    }

    let ids = FileIdentifiers::open(config.transaction_ids_path()).unwrap();
    for tx in block.transactions() {
        assert!(ids.has(&tx.id()).unwrap());
    }
    assert_eq!(ids.all().unwrap().len(), 2);
}

#[test]
fn test_channels_are_free_after_restart() {
    let rig = ChainRig::new();
    let dir = tempfile::tempdir().unwrap();
    let config = NodeConfig::at(dir.path());

    {
        let network = StubNetwork::new(Arc::new(Hub::new()));
        let node = LightChainNode::build(&config, &network, rig.genesis()).unwrap();
        node.close().unwrap();
    }

    // A fresh network has no registrations; the rebuilt node takes the
    // validated channels again without conflict.
    let network = StubNetwork::new(Arc::new(Hub::new()));
    let node = LightChainNode::build(&config, &network, rig.genesis()).unwrap();

    struct Null;
    impl Engine for Null {
        fn process(&self, _entity: Entity) -> Result<(), lc_types::ProcessError> {
            Ok(())
        }
    }
    let err = network
        .register(Arc::new(Null), channels::VALIDATED_BLOCKS)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        lc_network::NetworkError::ChannelOccupied { .. }
    ));
    node.close().unwrap();
}
