//! # Certificate and Proposal Validation
//!
//! Verification of validator certificate quorums, and the predicate set a
//! block validator runs over incoming proposals.

use lc_crypto::{PublicKey, Signature};
use lc_state::{Snapshot, State, ValidatorAssigner};
use lc_types::params::{
    MAX_TRANSACTIONS_NUM, MIN_TRANSACTIONS_NUM, SIGNATURE_THRESHOLD, VALIDATOR_THRESHOLD,
};
use lc_types::{BlockProposal, Certificate, Identifier};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Checks a certificate quorum for an entity against a snapshot.
pub trait CertificateVerifier: Send + Sync {
    /// Whether `certificates` contains at least the signature threshold of
    /// valid signatures over `message`, each from a distinct validator
    /// assigned to `entity_id` at `snapshot`.
    fn has_quorum(
        &self,
        entity_id: &Identifier,
        message: &[u8],
        certificates: &[Certificate],
        snapshot: &dyn Snapshot,
    ) -> bool;
}

/// Production verifier: derives the assignment and checks Ed25519
/// signatures against the snapshot's account keys.
pub struct QuorumVerifier {
    assigner: Arc<dyn ValidatorAssigner>,
}

impl QuorumVerifier {
    pub fn new(assigner: Arc<dyn ValidatorAssigner>) -> Self {
        Self { assigner }
    }
}

impl CertificateVerifier for QuorumVerifier {
    fn has_quorum(
        &self,
        entity_id: &Identifier,
        message: &[u8],
        certificates: &[Certificate],
        snapshot: &dyn Snapshot,
    ) -> bool {
        let assignment =
            match self
                .assigner
                .assign(entity_id, snapshot, VALIDATOR_THRESHOLD)
            {
                Ok(assignment) => assignment,
                Err(err) => {
                    warn!(entity = %entity_id, error = %err, "validator assignment failed");
                    return false;
                }
            };

        let mut counted: HashSet<Identifier> = HashSet::new();
        let mut valid = 0usize;
        for certificate in certificates {
            let signer = certificate.signer_id;
            // Each assigned validator counts once, however many
            // certificates it shows up in.
            if !assignment.has(&signer) || counted.contains(&signer) {
                continue;
            }
            let Some(account) = snapshot.account(&signer) else {
                continue;
            };
            let Ok(public_key) = PublicKey::from_bytes(account.public_key) else {
                debug!(signer = %signer, "assigned validator has malformed key");
                continue;
            };
            let signature = Signature::from_bytes(certificate.signature);
            if public_key.verify(message, &signature).is_ok() {
                counted.insert(signer);
                valid += 1;
            }
        }

        valid >= SIGNATURE_THRESHOLD
    }
}

/// The predicate set a validator runs over a block proposal before
/// voting. Each predicate is independent; a proposal is voted on only if
/// all of them hold.
pub struct ProposalValidator {
    state: Arc<dyn State>,
    assigner: Arc<dyn ValidatorAssigner>,
    verifier: QuorumVerifier,
}

impl ProposalValidator {
    pub fn new(state: Arc<dyn State>, assigner: Arc<dyn ValidatorAssigner>) -> Self {
        let verifier = QuorumVerifier::new(assigner.clone());
        Self {
            state,
            assigner,
            verifier,
        }
    }

    /// Parameter check: the parent block is known, the proposer exists at
    /// the parent snapshot, and the transaction count is within protocol
    /// bounds.
    pub fn is_correct(&self, proposal: &BlockProposal) -> bool {
        let Some(snapshot) = self.state.at_block_id(&proposal.header.previous_block_id) else {
            return false;
        };
        if snapshot.account(&proposal.header.proposer_id).is_none() {
            return false;
        }
        let tx_count = proposal.payload.transactions.len();
        (MIN_TRANSACTIONS_NUM..=MAX_TRANSACTIONS_NUM).contains(&tx_count)
    }

    /// Consistency check: the proposal extends the latest committed
    /// snapshot.
    pub fn is_consistent(&self, proposal: &BlockProposal) -> bool {
        self.state.last().reference_block_id() == proposal.header.previous_block_id
    }

    /// Authenticity check: the proposer signature verifies under the
    /// proposer's key at the parent snapshot.
    pub fn is_authenticated(&self, proposal: &BlockProposal) -> bool {
        let Some(snapshot) = self.state.at_block_id(&proposal.header.previous_block_id) else {
            return false;
        };
        let Some(account) = snapshot.account(&proposal.header.proposer_id) else {
            return false;
        };
        let Ok(public_key) = PublicKey::from_bytes(account.public_key) else {
            return false;
        };
        let signature = Signature::from_bytes(proposal.proposer_signature);
        public_key
            .verify(&proposal.signable_bytes(), &signature)
            .is_ok()
    }

    /// Stake check: the proposer holds at least the protocol minimum
    /// stake at the parent snapshot.
    pub fn proposer_has_enough_stake(&self, proposal: &BlockProposal) -> bool {
        let Some(snapshot) = self.state.at_block_id(&proposal.header.previous_block_id) else {
            return false;
        };
        snapshot
            .account(&proposal.header.proposer_id)
            .map(|account| account.is_staked())
            .unwrap_or(false)
    }

    /// Every carried transaction holds a certificate quorum from its
    /// assigned validators, checked at the parent snapshot.
    pub fn all_transactions_validated(&self, proposal: &BlockProposal) -> bool {
        let Some(snapshot) = self.state.at_block_id(&proposal.header.previous_block_id) else {
            return false;
        };
        proposal.payload.transactions.iter().all(|tx| {
            self.verifier.has_quorum(
                &tx.id(),
                &tx.signable_bytes(),
                &tx.certificates,
                snapshot.as_ref(),
            )
        })
    }

    /// Every carried transaction references a block strictly above its
    /// sender's last-seen block height.
    pub fn all_transactions_sound(&self, proposal: &BlockProposal) -> bool {
        let Some(snapshot) = self.state.at_block_id(&proposal.header.previous_block_id) else {
            return false;
        };
        proposal.payload.transactions.iter().all(|tx| {
            let Some(reference) = self.state.at_block_id(&tx.reference_block_id()) else {
                return false;
            };
            let Some(sender) = snapshot.account(&tx.transaction.sender) else {
                return false;
            };
            let Some(last) = self.state.at_block_id(&sender.last_block_id) else {
                return false;
            };
            reference.reference_block_height() > last.reference_block_height()
        })
    }

    /// No two carried transactions share a sender.
    pub fn no_duplicate_sender(&self, proposal: &BlockProposal) -> bool {
        let mut senders = HashSet::new();
        proposal
            .payload
            .transactions
            .iter()
            .all(|tx| senders.insert(tx.transaction.sender))
    }

    /// The proposer is the one assigned for the parent block.
    pub fn is_assigned_proposer(&self, proposal: &BlockProposal) -> bool {
        let Some(snapshot) = self.state.at_block_id(&proposal.header.previous_block_id) else {
            return false;
        };
        match self
            .assigner
            .next_block_proposer(&proposal.header.previous_block_id, snapshot.as_ref())
        {
            Ok(proposer) => proposer == proposal.header.proposer_id,
            Err(err) => {
                warn!(error = %err, "proposer assignment failed");
                false
            }
        }
    }
}
