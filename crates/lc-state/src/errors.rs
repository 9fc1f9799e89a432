//! Assignment error types.

use thiserror::Error;

/// Errors raised by validator assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignerError {
    /// The snapshot holds fewer staked accounts than requested validators.
    #[error("snapshot has {available} staked accounts, {required} required")]
    NotEnoughStakedAccounts { available: usize, required: usize },
}
