//! # Ingest Engine
//!
//! The race-free acceptance path for certified blocks and transactions
//! arriving from the network.
//!
//! ## Stores
//!
//! The engine cross-links four stores and keeps them consistent at every
//! observable boundary:
//!
//! - **seen entities**: id of every entity the engine ever processed,
//!   including rejected ones. The idempotence guard.
//! - **blocks**: committed blocks, keyed uniquely by block id.
//! - **transaction ids**: ids of transactions included in some committed
//!   block. Membership only grows.
//! - **pending transactions**: certified transactions not yet carried by
//!   any committed block. An id never lives here and in transaction ids
//!   at once.
//!
//! ## Concurrency
//!
//! `process` is safe under arbitrary parallel invocation. One mutex
//! serializes the dedup-check-through-commit section, so two concurrent
//! deliveries of the same entity collapse to exactly one acceptance, and
//! a block commit is atomic with respect to every other call's dedup
//! checks on the same transaction ids. Store touch order inside the
//! section is fixed: seen entities, blocks, transaction ids, pending
//! transactions.
//!
//! New-block subscribers run inside the same serialization point, after
//! the block's store mutations; they fire exactly once per committed
//! block and must not block.

use crate::subscriber::NewBlockSubscriber;
use crate::validation::CertificateVerifier;
use lc_state::State;
use lc_storage::{Blocks, Identifiers, StorageError, Transactions};
use lc_types::{Block, Engine, Entity, ProcessError, ValidatedTransaction};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info, warn};


/// The ingest engine. See the module docs for the store contract.
pub struct IngestEngine {
    state: Arc<dyn State>,
    blocks: Arc<dyn Blocks>,
    transaction_ids: Arc<dyn Identifiers>,
    pending_transactions: Arc<dyn Transactions>,
    seen_entities: Arc<dyn Identifiers>,
    verifier: Arc<dyn CertificateVerifier>,
    /// Serializes dedup checks and cross-index commits.
    ingest: Mutex<()>,
    subscribers: RwLock<Vec<Arc<dyn NewBlockSubscriber>>>,
}

impl IngestEngine {
    pub fn new(
        state: Arc<dyn State>,
        blocks: Arc<dyn Blocks>,
        transaction_ids: Arc<dyn Identifiers>,
        pending_transactions: Arc<dyn Transactions>,
        seen_entities: Arc<dyn Identifiers>,
        verifier: Arc<dyn CertificateVerifier>,
    ) -> Self {
        Self {
            state,
            blocks,
            transaction_ids,
            pending_transactions,
            seen_entities,
            verifier,
            ingest: Mutex::new(()),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Register a callback for newly committed blocks. Each committed
    /// block is announced to each subscriber exactly once.
    pub fn subscribe_new_validated_block(&self, subscriber: Arc<dyn NewBlockSubscriber>) {
        self.subscribers.write().push(subscriber);
    }

    fn process_block(&self, block: Block) -> Result<(), ProcessError> {
        let block_id = block.id();
        let _section = self.ingest.lock();

        if self.seen_entities.has(&block_id).map_err(store_err)? {
            debug!(block = %block_id, "block already processed");
            return Ok(());
        }

        let previous = block.previous_block_id();
        let Some(snapshot) = self.state.at_block_id(&previous) else {
            // Unknown parent: surfaced to the caller; a redelivery after
            // the parent commits will be accepted.
            return Err(ProcessError::UnknownReference { block_id: previous });
        };

        if !self.verifier.has_quorum(
            &block_id,
            &block.proposal.signable_bytes(),
            &block.certificates,
            snapshot.as_ref(),
        ) {
            warn!(block = %block_id, "discarding block without certificate quorum");
            self.seen_entities.add(block_id).map_err(store_err)?;
            return Ok(());
        }

        // Commit. Failure anywhere in here is fatal to the node: the
        // cross-index invariants cannot be repaired after a torn commit.
        self.seen_entities.add(block_id).map_err(store_err)?;
        self.blocks.add(block.clone()).map_err(store_err)?;
        for tx in block.transactions() {
            let tx_id = tx.id();
            self.transaction_ids.add(tx_id).map_err(store_err)?;
            if self.pending_transactions.has(&tx_id).map_err(store_err)? {
                self.pending_transactions
                    .remove(&tx_id)
                    .map_err(store_err)?;
            }
        }

        info!(
            block = %block_id,
            height = block.height(),
            transactions = block.transactions().len(),
            "committed validated block"
        );

        let subscribers = self.subscribers.read().clone();
        for subscriber in subscribers {
            subscriber.on_new_validated_block(block_id);
        }
        Ok(())
    }

    fn process_transaction(&self, tx: ValidatedTransaction) -> Result<(), ProcessError> {
        let tx_id = tx.id();
        let _section = self.ingest.lock();

        if self.seen_entities.has(&tx_id).map_err(store_err)? {
            debug!(tx = %tx_id, "transaction already processed");
            return Ok(());
        }

        if self.transaction_ids.has(&tx_id).map_err(store_err)? {
            // A committed block already carried it; remember the id and
            // keep it out of the pending set.
            self.seen_entities.add(tx_id).map_err(store_err)?;
            return Ok(());
        }

        let reference = tx.reference_block_id();
        let Some(snapshot) = self.state.at_block_id(&reference) else {
            return Err(ProcessError::UnknownReference { block_id: reference });
        };

        // A pending transaction must be drawn against settled state:
        // its reference block sits strictly below the latest snapshot.
        let last_height = self.state.last().reference_block_height();
        if snapshot.reference_block_height() >= last_height {
            warn!(
                tx = %tx_id,
                reference_height = snapshot.reference_block_height(),
                last_height,
                "discarding transaction referencing unsettled block"
            );
            self.seen_entities.add(tx_id).map_err(store_err)?;
            return Ok(());
        }

        if !self.verifier.has_quorum(
            &tx_id,
            &tx.signable_bytes(),
            &tx.certificates,
            snapshot.as_ref(),
        ) {
            warn!(tx = %tx_id, "discarding transaction without certificate quorum");
            self.seen_entities.add(tx_id).map_err(store_err)?;
            return Ok(());
        }

        self.seen_entities.add(tx_id).map_err(store_err)?;
        self.pending_transactions.add(tx).map_err(store_err)?;
        debug!(tx = %tx_id, "admitted pending transaction");
        Ok(())
    }
}

impl Engine for IngestEngine {
    fn process(&self, entity: Entity) -> Result<(), ProcessError> {
        match entity {
            Entity::Block(block) => self.process_block(block),
            Entity::ValidatedTransaction(tx) => self.process_transaction(tx),
            other => Err(ProcessError::UnsupportedEntity { kind: other.kind() }),
        }
    }
}

fn store_err(err: StorageError) -> ProcessError {
    ProcessError::Store(err.to_string())
}
