//! # Compound-Key File Store
//!
//! An ordered map `(primary: [u8; 32], secondary: u64) -> bytes` persisted
//! to a single file. Every file-backed store in the node is a thin layer
//! over this type.
//!
//! ## Durability
//!
//! Each committed mutation rewrites the full image atomically: records are
//! serialized, written to `<path>.tmp`, fsynced, then renamed over the
//! live file. A crash mid-write leaves the previous committed image
//! intact. At load time a record with a short tail or a CRC32 mismatch is
//! discarded together with everything after it.
//!
//! ## Record layout
//!
//! `[primary 32B][secondary 8B LE][value_len 4B LE][value][crc32 4B LE]`
//! with the checksum covering everything before it.
//!
//! ## Concurrency
//!
//! Readers share a `parking_lot` read lock; writers serialize on the
//! write lock. Removal is a tombstone: the entry leaves the in-memory map
//! and the next rewritten image no longer carries the record.

use crate::errors::StorageError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Primary key width in bytes.
pub const PRIMARY_LEN: usize = 32;

/// Compound key: 32-byte primary, integer secondary.
pub type CompoundKey = ([u8; PRIMARY_LEN], u64);

struct KvInner {
    map: BTreeMap<CompoundKey, Vec<u8>>,
    closed: bool,
}

/// Crash-safe, value-keyed compound-key store on one file.
pub struct FileKv {
    path: PathBuf,
    inner: RwLock<KvInner>,
}

impl FileKv {
    /// Open the store at `path`, loading any committed records.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let map = Self::load(&path)?;
        if !map.is_empty() {
            info!(path = %path.display(), records = map.len(), "loaded store file");
        }
        Ok(Self {
            path,
            inner: RwLock::new(KvInner { map, closed: false }),
        })
    }

    /// Value under the exact compound key.
    pub fn get(&self, key: &CompoundKey) -> Option<Vec<u8>> {
        self.inner.read().map.get(key).cloned()
    }

    /// Whether any record carries this primary key (byte-array equality).
    pub fn contains_primary(&self, primary: &[u8; PRIMARY_LEN]) -> bool {
        let inner = self.inner.read();
        inner.map.keys().any(|(p, _)| p == primary)
    }

    /// First value whose primary key equals `primary`.
    pub fn get_by_primary(&self, primary: &[u8; PRIMARY_LEN]) -> Option<Vec<u8>> {
        let inner = self.inner.read();
        inner
            .map
            .iter()
            .find(|((p, _), _)| p == primary)
            .map(|(_, v)| v.clone())
    }

    /// First value whose secondary key equals `secondary`.
    pub fn get_by_secondary(&self, secondary: u64) -> Option<Vec<u8>> {
        let inner = self.inner.read();
        inner
            .map
            .iter()
            .find(|((_, s), _)| *s == secondary)
            .map(|(_, v)| v.clone())
    }

    /// Insert the record if the compound key is absent. Returns true iff
    /// newly inserted; an existing key leaves the stored value untouched.
    pub fn insert_if_absent(&self, key: CompoundKey, value: Vec<u8>) -> Result<bool, StorageError> {
        let mut inner = self.inner.write();
        self.ensure_open(&inner)?;
        if inner.map.contains_key(&key) {
            return Ok(false);
        }
        inner.map.insert(key, value);
        match self.persist(&inner) {
            Ok(()) => Ok(true),
            Err(err) => {
                // Keep memory and disk consistent on a failed flush.
                inner.map.remove(&key);
                Err(err)
            }
        }
    }

    /// Remove every record under this primary key. Returns true iff at
    /// least one record existed.
    pub fn remove_by_primary(&self, primary: &[u8; PRIMARY_LEN]) -> Result<bool, StorageError> {
        let mut inner = self.inner.write();
        self.ensure_open(&inner)?;
        let doomed: Vec<CompoundKey> = inner
            .map
            .keys()
            .filter(|(p, _)| p == primary)
            .copied()
            .collect();
        if doomed.is_empty() {
            return Ok(false);
        }
        let mut removed = Vec::with_capacity(doomed.len());
        for key in doomed {
            if let Some(value) = inner.map.remove(&key) {
                removed.push((key, value));
            }
        }
        match self.persist(&inner) {
            Ok(()) => Ok(true),
            Err(err) => {
                for (key, value) in removed {
                    inner.map.insert(key, value);
                }
                Err(err)
            }
        }
    }

    /// All values in key order.
    pub fn values(&self) -> Vec<Vec<u8>> {
        self.inner.read().map.values().cloned().collect()
    }

    /// All compound keys in order.
    pub fn keys(&self) -> Vec<CompoundKey> {
        self.inner.read().map.keys().copied().collect()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    /// Whether the store holds no live records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().map.is_empty()
    }

    /// Flush and mark the store closed. Idempotent; mutations after close
    /// fail with [`StorageError::Closed`].
    pub fn close(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Ok(());
        }
        self.persist(&inner)?;
        inner.closed = true;
        Ok(())
    }

    fn ensure_open(&self, inner: &KvInner) -> Result<(), StorageError> {
        if inner.closed {
            return Err(StorageError::Closed {
                path: self.path.display().to_string(),
            });
        }
        Ok(())
    }

    fn io_err(&self, err: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn load(path: &Path) -> Result<BTreeMap<CompoundKey, Vec<u8>>, StorageError> {
        let mut map = BTreeMap::new();
        let mut file = match std::fs::File::open(path) {
            Ok(file) => file,
            // A store that never flushed is an empty store.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(map),
            Err(err) => {
                return Err(StorageError::Io {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })
            }
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|err| StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        let mut cursor = 0usize;
        while cursor < bytes.len() {
            let Some((key, value, next)) = Self::parse_record(&bytes, cursor) else {
                warn!(
                    path = %path.display(),
                    offset = cursor,
                    "discarding torn tail of store file"
                );
                break;
            };
            map.insert(key, value);
            cursor = next;
        }
        Ok(map)
    }

    fn parse_record(bytes: &[u8], start: usize) -> Option<(CompoundKey, Vec<u8>, usize)> {
        let header_len = PRIMARY_LEN + 8 + 4;
        if start + header_len > bytes.len() {
            return None;
        }
        let mut primary = [0u8; PRIMARY_LEN];
        primary.copy_from_slice(&bytes[start..start + PRIMARY_LEN]);
        let mut offset = start + PRIMARY_LEN;

        let secondary = u64::from_le_bytes(bytes[offset..offset + 8].try_into().ok()?);
        offset += 8;
        let value_len = u32::from_le_bytes(bytes[offset..offset + 4].try_into().ok()?) as usize;
        offset += 4;

        if offset + value_len + 4 > bytes.len() {
            return None;
        }
        let value = bytes[offset..offset + value_len].to_vec();
        offset += value_len;

        let stored_crc = u32::from_le_bytes(bytes[offset..offset + 4].try_into().ok()?);
        offset += 4;
        if crc32fast::hash(&bytes[start..offset - 4]) != stored_crc {
            return None;
        }

        Some(((primary, secondary), value, offset))
    }

    fn persist(&self, inner: &KvInner) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| self.io_err(err))?;
            }
        }

        let mut bytes = Vec::new();
        for ((primary, secondary), value) in &inner.map {
            let record_start = bytes.len();
            bytes.extend_from_slice(primary);
            bytes.extend_from_slice(&secondary.to_le_bytes());
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
            let crc = crc32fast::hash(&bytes[record_start..]);
            bytes.extend_from_slice(&crc.to_le_bytes());
        }

        // Atomic replace: tmp file, fsync, rename.
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(|err| self.io_err(err))?;
        file.write_all(&bytes).map_err(|err| self.io_err(err))?;
        file.sync_all().map_err(|err| self.io_err(err))?;
        std::fs::rename(&temp_path, &self.path).map_err(|err| self.io_err(err))?;
        Ok(())
    }
}
