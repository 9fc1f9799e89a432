//! # File-Backed Store Adapters
//!
//! Durable implementations of the store ports over [`FileKv`].
//!
//! The blocks store keeps two files: the primary keyed by
//! `(block id, height)` holding the encoded block, and a height index
//! keyed by `(height bytes, height)` holding the block id. Identifier and
//! transaction stores are one file each, with secondary key 0.

use crate::errors::StorageError;
use crate::kv::{FileKv, PRIMARY_LEN};
use crate::ports::{Blocks, Identifiers, Transactions};
use lc_types::{Block, Identifier, ValidatedTransaction};
use std::path::Path;

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(value).map_err(|err| StorageError::Codec {
        message: err.to_string(),
    })
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, StorageError> {
    bincode::deserialize(bytes).map_err(|err| StorageError::Codec {
        message: err.to_string(),
    })
}

fn height_key(height: u64) -> [u8; PRIMARY_LEN] {
    let mut key = [0u8; PRIMARY_LEN];
    key[..8].copy_from_slice(&height.to_le_bytes());
    key
}

/// Durable blocks store: primary file plus height index file.
pub struct FileBlocks {
    primary: FileKv,
    by_height: FileKv,
}

impl FileBlocks {
    /// Open (or create) the two store files.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(
        primary_path: P,
        height_index_path: Q,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            primary: FileKv::open(primary_path)?,
            by_height: FileKv::open(height_index_path)?,
        })
    }

    /// Flush both files and mark the store closed. Idempotent.
    pub fn close(&self) -> Result<(), StorageError> {
        self.primary.close()?;
        self.by_height.close()
    }
}

impl Blocks for FileBlocks {
    fn has(&self, block_id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.primary.contains_primary(block_id.as_bytes()))
    }

    fn add(&self, block: Block) -> Result<bool, StorageError> {
        let id = block.id();
        if self.primary.contains_primary(id.as_bytes()) {
            return Ok(false);
        }
        let height = block.height();
        let value = encode(&block)?;
        let inserted = self
            .primary
            .insert_if_absent((*id.as_bytes(), height), value)?;
        if inserted {
            self.by_height
                .insert_if_absent((height_key(height), height), id.as_bytes().to_vec())?;
        }
        Ok(inserted)
    }

    fn remove(&self, block_id: &Identifier) -> Result<bool, StorageError> {
        let Some(bytes) = self.primary.get_by_primary(block_id.as_bytes()) else {
            return Ok(false);
        };
        let block: Block = decode(&bytes)?;
        self.primary.remove_by_primary(block_id.as_bytes())?;
        self.by_height.remove_by_primary(&height_key(block.height()))?;
        Ok(true)
    }

    fn by_id(&self, block_id: &Identifier) -> Result<Option<Block>, StorageError> {
        self.primary
            .get_by_primary(block_id.as_bytes())
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn at_height(&self, height: u64) -> Result<Option<Block>, StorageError> {
        if let Some(id_bytes) = self.by_height.get(&(height_key(height), height)) {
            let mut id = [0u8; PRIMARY_LEN];
            if id_bytes.len() == PRIMARY_LEN {
                id.copy_from_slice(&id_bytes);
                return self.by_id(&Identifier::from_bytes(id));
            }
        }
        // Fall back to a primary scan for images written without the index.
        self.primary
            .get_by_secondary(height)
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn all(&self) -> Result<Vec<Block>, StorageError> {
        self.primary
            .values()
            .iter()
            .map(|bytes| decode(bytes))
            .collect()
    }
}

/// Durable identifier set on one file.
pub struct FileIdentifiers {
    kv: FileKv,
}

impl FileIdentifiers {
    /// Open (or create) the store file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self {
            kv: FileKv::open(path)?,
        })
    }

    /// Flush and mark the store closed. Idempotent.
    pub fn close(&self) -> Result<(), StorageError> {
        self.kv.close()
    }
}

impl Identifiers for FileIdentifiers {
    fn has(&self, id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.kv.contains_primary(id.as_bytes()))
    }

    fn add(&self, id: Identifier) -> Result<bool, StorageError> {
        self.kv.insert_if_absent((*id.as_bytes(), 0), Vec::new())
    }

    fn remove(&self, id: &Identifier) -> Result<bool, StorageError> {
        self.kv.remove_by_primary(id.as_bytes())
    }

    fn all(&self) -> Result<Vec<Identifier>, StorageError> {
        Ok(self
            .kv
            .keys()
            .into_iter()
            .map(|(primary, _)| Identifier::from_bytes(primary))
            .collect())
    }
}

/// Durable pending-transaction store on one file.
pub struct FileTransactions {
    kv: FileKv,
}

impl FileTransactions {
    /// Open (or create) the store file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self {
            kv: FileKv::open(path)?,
        })
    }

    /// Flush and mark the store closed. Idempotent.
    pub fn close(&self) -> Result<(), StorageError> {
        self.kv.close()
    }
}

impl Transactions for FileTransactions {
    fn has(&self, tx_id: &Identifier) -> Result<bool, StorageError> {
        Ok(self.kv.contains_primary(tx_id.as_bytes()))
    }

    fn add(&self, tx: ValidatedTransaction) -> Result<bool, StorageError> {
        let id = tx.id();
        let value = encode(&tx)?;
        self.kv.insert_if_absent((*id.as_bytes(), 0), value)
    }

    fn remove(&self, tx_id: &Identifier) -> Result<bool, StorageError> {
        self.kv.remove_by_primary(tx_id.as_bytes())
    }

    fn by_id(&self, tx_id: &Identifier) -> Result<Option<ValidatedTransaction>, StorageError> {
        self.kv
            .get_by_primary(tx_id.as_bytes())
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn all(&self) -> Result<Vec<ValidatedTransaction>, StorageError> {
        self.kv.values().iter().map(|bytes| decode(bytes)).collect()
    }

    fn size(&self) -> Result<usize, StorageError> {
        Ok(self.kv.len())
    }
}
