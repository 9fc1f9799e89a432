//! # Store Ports
//!
//! The capability traits the ingest engine and queries consume. Each
//! caller receives exactly the operations it needs as a trait object; the
//! adapters behind them are interchangeable (file-backed in the node,
//! in-memory in unit tests).
//!
//! All operations take `&self` and are safe under concurrent invocation;
//! implementations guard internally. Lookups compare identifiers by byte
//! value.

use crate::errors::StorageError;
use lc_types::{Block, Identifier, ValidatedTransaction};

/// Committed blocks, keyed uniquely by block identifier.
pub trait Blocks: Send + Sync {
    /// Whether a block with this identifier exists.
    fn has(&self, block_id: &Identifier) -> Result<bool, StorageError>;

    /// Insert the block if its identifier is absent. Returns true iff
    /// newly inserted; re-adding the same block is a no-op.
    fn add(&self, block: Block) -> Result<bool, StorageError>;

    /// Remove the block with this identifier. Returns true iff it existed.
    fn remove(&self, block_id: &Identifier) -> Result<bool, StorageError>;

    /// The block with this identifier, if any.
    fn by_id(&self, block_id: &Identifier) -> Result<Option<Block>, StorageError>;

    /// The block at this height, if any.
    fn at_height(&self, height: u64) -> Result<Option<Block>, StorageError>;

    /// All stored blocks.
    fn all(&self) -> Result<Vec<Block>, StorageError>;
}

/// A set of identifiers (seen entities, committed transaction ids).
pub trait Identifiers: Send + Sync {
    /// Whether the identifier is in the set.
    fn has(&self, id: &Identifier) -> Result<bool, StorageError>;

    /// Insert the identifier. Returns true iff newly inserted.
    fn add(&self, id: Identifier) -> Result<bool, StorageError>;

    /// Remove the identifier. Returns true iff it was present.
    fn remove(&self, id: &Identifier) -> Result<bool, StorageError>;

    /// All identifiers in the set.
    fn all(&self) -> Result<Vec<Identifier>, StorageError>;
}

/// Pending validated transactions, keyed by transaction identifier.
pub trait Transactions: Send + Sync {
    /// Whether a transaction with this identifier is pending.
    fn has(&self, tx_id: &Identifier) -> Result<bool, StorageError>;

    /// Insert the transaction if its identifier is absent. Returns true
    /// iff newly inserted.
    fn add(&self, tx: ValidatedTransaction) -> Result<bool, StorageError>;

    /// Remove the transaction with this identifier. Returns true iff it
    /// was pending.
    fn remove(&self, tx_id: &Identifier) -> Result<bool, StorageError>;

    /// The pending transaction with this identifier, if any.
    fn by_id(&self, tx_id: &Identifier) -> Result<Option<ValidatedTransaction>, StorageError>;

    /// All pending transactions.
    fn all(&self) -> Result<Vec<ValidatedTransaction>, StorageError>;

    /// Number of pending transactions.
    fn size(&self) -> Result<usize, StorageError>;
}
