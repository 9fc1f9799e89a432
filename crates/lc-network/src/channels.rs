//! # Well-Known Channels
//!
//! The named sub-networks of LightChain. Exactly one engine registers per
//! channel on each node.

/// Demo hello traffic.
pub const BROADCAST: &str = "broadcast-channel";

/// Proposals on their way to validators.
pub const PROPOSED_BLOCKS: &str = "proposed-blocks";

/// Certified blocks bound for the ingest engine.
pub const VALIDATED_BLOCKS: &str = "validated-blocks";

/// Certified transactions bound for the ingest engine.
pub const VALIDATED_TRANSACTIONS: &str = "validated-transactions";

/// Validator votes on proposals.
pub const PROPOSALS_VOTING: &str = "proposals-voting";
