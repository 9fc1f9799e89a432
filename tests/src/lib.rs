//! # LightChain Test Suite
//!
//! Cross-crate integration tests:
//! - **integration/support**: the shared chain rig (keyed accounts,
//!   snapshots, certified entities).
//! - **integration/pipeline**: validated blocks and transactions flowing
//!   over the hub into ingest nodes.
//! - **integration/persistence**: durable stores across node restarts.
//! - **integration/lifecycle**: component manager behavior over real
//!   nodes.

#![allow(dead_code)]

pub mod integration;
