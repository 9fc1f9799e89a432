//! # Protocol State
//!
//! Lookup of account snapshots by committed block identifier. The ingest
//! engine resolves every entity's reference block here before verifying
//! its certificates.

use crate::snapshot::Snapshot;
use lc_types::Identifier;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Snapshot lookup across committed blocks.
pub trait State: Send + Sync {
    /// The snapshot at the given block, or `None` for an unknown block.
    fn at_block_id(&self, block_id: &Identifier) -> Option<Arc<dyn Snapshot>>;

    /// The snapshot of the latest committed block.
    fn last(&self) -> Arc<dyn Snapshot>;
}

/// Hash-table state implementation.
///
/// Tracks the highest-height snapshot as the latest; registration of new
/// snapshots is concurrent with lookups.
pub struct TableState {
    snapshots: RwLock<HashMap<Identifier, Arc<dyn Snapshot>>>,
    last: RwLock<Arc<dyn Snapshot>>,
}

impl TableState {
    /// State seeded with the genesis snapshot.
    pub fn new(genesis: Arc<dyn Snapshot>) -> Self {
        let mut snapshots: HashMap<Identifier, Arc<dyn Snapshot>> = HashMap::new();
        snapshots.insert(genesis.reference_block_id(), genesis.clone());
        Self {
            snapshots: RwLock::new(snapshots),
            last: RwLock::new(genesis),
        }
    }

    /// Register the snapshot at a newly committed block.
    pub fn put(&self, snapshot: Arc<dyn Snapshot>) {
        let mut snapshots = self.snapshots.write();
        snapshots.insert(snapshot.reference_block_id(), snapshot.clone());

        let mut last = self.last.write();
        if snapshot.reference_block_height() >= last.reference_block_height() {
            *last = snapshot;
        }
    }
}

impl State for TableState {
    fn at_block_id(&self, block_id: &Identifier) -> Option<Arc<dyn Snapshot>> {
        self.snapshots.read().get(block_id).cloned()
    }

    fn last(&self) -> Arc<dyn Snapshot> {
        self.last.read().clone()
    }
}
