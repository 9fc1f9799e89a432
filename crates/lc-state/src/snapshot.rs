//! # Snapshots
//!
//! A snapshot is the immutable account table as of one committed block.
//! Consumers only read; construction happens through the builder before
//! the snapshot is shared.

use lc_types::{Account, Identifier};
use std::collections::HashMap;

/// Read-only view of the account table at a reference block.
pub trait Snapshot: Send + Sync {
    /// Identifier of the block this snapshot is taken at.
    fn reference_block_id(&self) -> Identifier;

    /// Height of the reference block.
    fn reference_block_height(&self) -> u64;

    /// The account with this identifier, if present.
    fn account(&self, id: &Identifier) -> Option<Account>;

    /// All accounts in the snapshot.
    fn all(&self) -> Vec<Account>;
}

/// Hash-table snapshot implementation.
pub struct TableSnapshot {
    reference_block_id: Identifier,
    reference_block_height: u64,
    accounts: HashMap<Identifier, Account>,
}

impl TableSnapshot {
    /// An empty snapshot at the given reference block.
    pub fn new(reference_block_id: Identifier, reference_block_height: u64) -> Self {
        Self {
            reference_block_id,
            reference_block_height,
            accounts: HashMap::new(),
        }
    }

    /// Add an account (builder step; consumes and returns the snapshot).
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.insert(account.id, account);
        self
    }

    /// Add many accounts (builder step).
    pub fn with_accounts(mut self, accounts: impl IntoIterator<Item = Account>) -> Self {
        for account in accounts {
            self.accounts.insert(account.id, account);
        }
        self
    }
}

impl Snapshot for TableSnapshot {
    fn reference_block_id(&self) -> Identifier {
        self.reference_block_id
    }

    fn reference_block_height(&self) -> u64 {
        self.reference_block_height
    }

    fn account(&self, id: &Identifier) -> Option<Account> {
        self.accounts.get(id).cloned()
    }

    fn all(&self) -> Vec<Account> {
        self.accounts.values().cloned().collect()
    }
}
