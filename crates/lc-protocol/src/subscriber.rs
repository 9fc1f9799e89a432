//! # New-Block Subscriptions
//!
//! Callback contract for components that react to freshly committed
//! blocks (snapshot construction, proposal scheduling).

use lc_types::Identifier;

/// Observer of newly committed validated blocks.
///
/// Invoked exactly once per committed block, on the ingest thread, after
/// the block's stores are updated and before any other block commits.
/// Implementations must not block.
pub trait NewBlockSubscriber: Send + Sync {
    /// A block with this identifier passed validation and was committed.
    fn on_new_validated_block(&self, block_id: Identifier);
}
