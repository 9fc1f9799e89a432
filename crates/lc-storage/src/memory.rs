//! # In-Memory Store Adapters
//!
//! Lock-guarded hash-map implementations of the store ports for unit
//! tests and ephemeral nodes. Semantics match the file-backed adapters
//! minus durability.

use crate::errors::StorageError;
use crate::ports::{Blocks, Identifiers, Transactions};
use lc_types::{Block, Identifier, ValidatedTransaction};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory blocks store.
#[derive(Default)]
pub struct MemoryBlocks {
    map: RwLock<HashMap<Identifier, Block>>,
}

impl MemoryBlocks {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Blocks for MemoryBlocks {
    fn has(&self, block_id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.map.read().contains_key(block_id))
    }

    fn add(&self, block: Block) -> Result<bool, StorageError> {
        let mut map = self.map.write();
        let id = block.id();
        if map.contains_key(&id) {
            return Ok(false);
        }
        map.insert(id, block);
        Ok(true)
    }

    fn remove(&self, block_id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.map.write().remove(block_id).is_some())
    }

    fn by_id(&self, block_id: &Identifier) -> Result<Option<Block>, StorageError> {
        Ok(self.map.read().get(block_id).cloned())
    }

    fn at_height(&self, height: u64) -> Result<Option<Block>, StorageError> {
        Ok(self
            .map
            .read()
            .values()
            .find(|block| block.height() == height)
            .cloned())
    }

    fn all(&self) -> Result<Vec<Block>, StorageError> {
        Ok(self.map.read().values().cloned().collect())
    }
}

/// In-memory identifier set.
#[derive(Default)]
pub struct MemoryIdentifiers {
    set: RwLock<HashMap<Identifier, ()>>,
}

impl MemoryIdentifiers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Identifiers for MemoryIdentifiers {
    fn has(&self, id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.set.read().contains_key(id))
    }

    fn add(&self, id: Identifier) -> Result<bool, StorageError> {
        Ok(self.set.write().insert(id, ()).is_none())
    }

    fn remove(&self, id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.set.write().remove(id).is_some())
    }

    fn all(&self) -> Result<Vec<Identifier>, StorageError> {
        Ok(self.set.read().keys().copied().collect())
    }
}

/// In-memory pending-transaction store.
#[derive(Default)]
pub struct MemoryTransactions {
    map: RwLock<HashMap<Identifier, ValidatedTransaction>>,
}

impl MemoryTransactions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transactions for MemoryTransactions {
    fn has(&self, tx_id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.map.read().contains_key(tx_id))
    }

    fn add(&self, tx: ValidatedTransaction) -> Result<bool, StorageError> {
        let mut map = self.map.write();
        let id = tx.id();
        if map.contains_key(&id) {
            return Ok(false);
        }
        map.insert(id, tx);
        Ok(true)
    }

    fn remove(&self, tx_id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.map.write().remove(tx_id).is_some())
    }

    fn by_id(&self, tx_id: &Identifier) -> Result<Option<ValidatedTransaction>, StorageError> {
        Ok(self.map.read().get(tx_id).cloned())
    }

    fn all(&self) -> Result<Vec<ValidatedTransaction>, StorageError> {
        Ok(self.map.read().values().cloned().collect())
    }

    fn size(&self) -> Result<usize, StorageError> {
        Ok(self.map.read().len())
    }
}
