//! # Node Configuration
//!
//! Where the stores live and how the demo traffic behaves. Protocol
//! constants are not configuration; they live in `lc_types::params`.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration of one LightChain node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Directory holding every store file.
    pub data_dir: PathBuf,
    /// Pause between demo hello rounds.
    pub broadcast_interval: Duration,
    /// Number of demo hello rounds before the broadcast engine goes
    /// quiet.
    pub broadcast_rounds: usize,
}

impl NodeConfig {
    /// Configuration rooted at the given data directory.
    pub fn at<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Blocks store, primary file (keyed by id and height).
    pub fn blocks_path(&self) -> PathBuf {
        self.data_dir.join("blocks-id.db")
    }

    /// Blocks store, height index file.
    pub fn blocks_height_path(&self) -> PathBuf {
        self.data_dir.join("blocks-height.db")
    }

    /// Committed transaction-id store file.
    pub fn transaction_ids_path(&self) -> PathBuf {
        self.data_dir.join("transaction-ids.db")
    }

    /// Seen-entity store file.
    pub fn seen_entities_path(&self) -> PathBuf {
        self.data_dir.join("seen-entities.db")
    }

    /// Pending-transaction store file.
    pub fn pending_transactions_path(&self) -> PathBuf {
        self.data_dir.join("pending-transactions.db")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("lightchain-data"),
            broadcast_interval: Duration::from_secs(1),
            broadcast_rounds: 500,
        }
    }
}
