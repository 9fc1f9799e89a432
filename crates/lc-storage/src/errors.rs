//! Storage error types.

use thiserror::Error;

/// Errors raised by the persistent stores.
///
/// Any of these surfacing from a store that backs the ingest pipeline is
/// fatal to the node: a half-applied commit cannot be reconciled with the
/// cross-index invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("io error on {path}: {message}")]
    Io { path: String, message: String },

    /// A stored value failed to encode or decode.
    #[error("codec error: {message}")]
    Codec { message: String },

    /// The store was used after `close()`.
    #[error("store at {path} is closed")]
    Closed { path: String },
}
