//! # Validator Assignment
//!
//! Deterministic selection of K validators for an entity from the staked
//! accounts of a snapshot. Determinism is load-bearing: every node must
//! derive the same assignment from the same `(entity, snapshot, k)` or
//! certificate quorums would never be agreed on.
//!
//! ## Strategy
//!
//! Staked account ids are sorted lexicographically, a ChaCha20 PRF is
//! seeded with the entity identifier, and K distinct indices are drawn
//! without replacement.

use crate::errors::AssignerError;
use crate::snapshot::Snapshot;
use lc_types::Identifier;
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// The K account ids assigned to validate one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    validators: Vec<Identifier>,
}

impl Assignment {
    /// Build from the chosen validator ids.
    pub fn new(validators: Vec<Identifier>) -> Self {
        Self { validators }
    }

    /// Whether this account id is one of the assigned validators.
    pub fn has(&self, id: &Identifier) -> bool {
        self.validators.contains(id)
    }

    /// The assigned validator ids, in selection order.
    pub fn validators(&self) -> &[Identifier] {
        &self.validators
    }

    /// Number of assigned validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the assignment is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Deterministic assignment of validators to entities.
pub trait ValidatorAssigner: Send + Sync {
    /// Assign exactly `k` distinct staked validators for the entity.
    fn assign(
        &self,
        entity_id: &Identifier,
        snapshot: &dyn Snapshot,
        k: usize,
    ) -> Result<Assignment, AssignerError>;

    /// Pick the proposer of the block following `current_block_id`.
    fn next_block_proposer(
        &self,
        current_block_id: &Identifier,
        snapshot: &dyn Snapshot,
    ) -> Result<Identifier, AssignerError> {
        let assignment = self.assign(current_block_id, snapshot, 1)?;
        // assign(k=1) yields exactly one validator.
        assignment
            .validators()
            .first()
            .copied()
            .ok_or(AssignerError::NotEnoughStakedAccounts {
                available: 0,
                required: 1,
            })
    }
}

/// PRF-seeded assignment over the sorted staked account ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct StakeAssigner;

impl StakeAssigner {
    pub fn new() -> Self {
        Self
    }
}

impl ValidatorAssigner for StakeAssigner {
    fn assign(
        &self,
        entity_id: &Identifier,
        snapshot: &dyn Snapshot,
        k: usize,
    ) -> Result<Assignment, AssignerError> {
        let mut staked: Vec<Identifier> = snapshot
            .all()
            .into_iter()
            .filter(|account| account.is_staked())
            .map(|account| account.id)
            .collect();

        if staked.len() < k {
            return Err(AssignerError::NotEnoughStakedAccounts {
                available: staked.len(),
                required: k,
            });
        }

        staked.sort_unstable();

        let mut rng = ChaCha20Rng::from_seed(*entity_id.as_bytes());
        let chosen = index::sample(&mut rng, staked.len(), k);
        Ok(Assignment::new(
            chosen.iter().map(|i| staked[i]).collect(),
        ))
    }
}
