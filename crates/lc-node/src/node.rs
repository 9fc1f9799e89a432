//! # Node Assembly
//!
//! Opens the durable stores, seeds the protocol state, wires the ingest
//! engine and registers it on the validated-entity channels.

use crate::component::{Component, ComponentError};
use crate::config::NodeConfig;
use async_trait::async_trait;
use lc_network::{channels, Network, NetworkError};
use lc_protocol::{IngestEngine, NewBlockSubscriber, QuorumVerifier};
use lc_state::{Snapshot, StakeAssigner, TableState};
use lc_storage::{FileBlocks, FileIdentifiers, FileTransactions, StorageError};
use lc_types::Identifier;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Errors raised while assembling or shutting down a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// A durable store failed to open or close.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An engine could not register on its channel.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// A wired LightChain node: stores, state and the ingest engine,
/// registered on the validated-blocks and validated-transactions
/// channels.
pub struct LightChainNode {
    node_id: Identifier,
    state: Arc<TableState>,
    blocks: Arc<FileBlocks>,
    transaction_ids: Arc<FileIdentifiers>,
    seen_entities: Arc<FileIdentifiers>,
    pending_transactions: Arc<FileTransactions>,
    engine: Arc<IngestEngine>,
}

impl LightChainNode {
    /// Open the stores under the configured data directory, seed the
    /// state with the genesis snapshot and register the ingest engine.
    pub fn build(
        config: &NodeConfig,
        network: &dyn Network,
        genesis: Arc<dyn Snapshot>,
    ) -> Result<Arc<Self>, NodeError> {
        let blocks = Arc::new(FileBlocks::open(
            config.blocks_path(),
            config.blocks_height_path(),
        )?);
        let transaction_ids = Arc::new(FileIdentifiers::open(config.transaction_ids_path())?);
        let seen_entities = Arc::new(FileIdentifiers::open(config.seen_entities_path())?);
        let pending_transactions =
            Arc::new(FileTransactions::open(config.pending_transactions_path())?);

        let state = Arc::new(TableState::new(genesis));
        let assigner = Arc::new(StakeAssigner::new());
        let verifier = Arc::new(QuorumVerifier::new(assigner));

        let engine = Arc::new(IngestEngine::new(
            state.clone(),
            blocks.clone(),
            transaction_ids.clone(),
            pending_transactions.clone(),
            seen_entities.clone(),
            verifier,
        ));
        network.register(engine.clone(), channels::VALIDATED_BLOCKS)?;
        network.register(engine.clone(), channels::VALIDATED_TRANSACTIONS)?;

        info!(
            node = %network.id(),
            data_dir = %config.data_dir.display(),
            "ingest node wired"
        );
        Ok(Arc::new(Self {
            node_id: network.id(),
            state,
            blocks,
            transaction_ids,
            seen_entities,
            pending_transactions,
            engine,
        }))
    }

    /// This node's network identifier.
    pub fn id(&self) -> Identifier {
        self.node_id
    }

    /// The ingest engine, for local queries and subscriptions.
    pub fn engine(&self) -> &Arc<IngestEngine> {
        &self.engine
    }

    /// The protocol state, for registering new snapshots.
    pub fn state(&self) -> &Arc<TableState> {
        &self.state
    }

    /// The durable blocks store.
    pub fn blocks(&self) -> &Arc<FileBlocks> {
        &self.blocks
    }

    /// Subscribe to newly committed blocks.
    pub fn subscribe_new_validated_block(&self, subscriber: Arc<dyn NewBlockSubscriber>) {
        self.engine.subscribe_new_validated_block(subscriber);
    }

    /// Flush and close every store. Idempotent.
    pub fn close(&self) -> Result<(), NodeError> {
        self.blocks.close()?;
        self.transaction_ids.close()?;
        self.seen_entities.close()?;
        self.pending_transactions.close()?;
        Ok(())
    }
}

#[async_trait]
impl Component for LightChainNode {
    fn name(&self) -> &'static str {
        "ingest-node"
    }

    async fn start(&self) -> Result<(), ComponentError> {
        // Stores and channel registrations are acquired at build time;
        // reaching start means the node is ready.
        Ok(())
    }

    async fn stop(&self) {
        if let Err(err) = self.close() {
            error!(node = %self.node_id, error = %err, "closing stores failed");
        }
    }
}
