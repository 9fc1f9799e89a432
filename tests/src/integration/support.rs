//! Shared chain rig for integration tests: keypair-backed staked
//! accounts, a genesis and a tip snapshot, and helpers that certify
//! blocks and transactions the way their assigned validators would.

use lc_ads::merkle_root_of;
use lc_crypto::KeyPair;
use lc_state::{Snapshot, StakeAssigner, TableSnapshot, TableState, ValidatorAssigner};
use lc_types::params::{MIN_STAKE, VALIDATOR_THRESHOLD};
use lc_types::{
    fixtures, Account, Block, BlockHeader, BlockPayload, BlockProposal, Certificate, Identifier,
    Transaction, ValidatedTransaction,
};
use std::sync::Arc;

/// A minimal chain context shared by all nodes of a test network.
pub struct ChainRig {
    pub keyed: Vec<(KeyPair, Account)>,
    pub genesis_id: Identifier,
    pub tip_id: Identifier,
    pub assigner: Arc<StakeAssigner>,
    genesis: Arc<TableSnapshot>,
    tip: Arc<TableSnapshot>,
}

impl ChainRig {
    pub fn new() -> Self {
        let keyed: Vec<(KeyPair, Account)> = (0..VALIDATOR_THRESHOLD + 3)
            .map(|_| fixtures::keyed_account_fixture(MIN_STAKE + 10))
            .collect();
        let accounts: Vec<Account> = keyed.iter().map(|(_, account)| account.clone()).collect();

        let genesis_id = fixtures::identifier_fixture();
        let tip_id = fixtures::identifier_fixture();
        Self {
            keyed,
            genesis_id,
            tip_id,
            assigner: Arc::new(StakeAssigner::new()),
            genesis: Arc::new(TableSnapshot::new(genesis_id, 0).with_accounts(accounts.clone())),
            tip: Arc::new(TableSnapshot::new(tip_id, 1).with_accounts(accounts)),
        }
    }

    /// The genesis snapshot every node seeds its state with.
    pub fn genesis(&self) -> Arc<dyn Snapshot> {
        self.genesis.clone()
    }

    /// The snapshot at the tip block (height 1).
    pub fn tip(&self) -> Arc<dyn Snapshot> {
        self.tip.clone()
    }

    /// A fresh state holding genesis and the tip, as each node would
    /// carry after committing one block.
    pub fn state(&self) -> Arc<TableState> {
        let state = Arc::new(TableState::new(self.genesis()));
        state.put(self.tip.clone());
        state
    }

    fn snapshot(&self, block_id: &Identifier) -> Arc<dyn Snapshot> {
        if *block_id == self.genesis_id {
            self.genesis.clone()
        } else {
            self.tip.clone()
        }
    }

    /// Certificates from every validator assigned to `entity_id` at the
    /// given snapshot block.
    pub fn certify(
        &self,
        entity_id: &Identifier,
        message: &[u8],
        snapshot_block: &Identifier,
    ) -> Vec<Certificate> {
        let snapshot = self.snapshot(snapshot_block);
        let assignment = self
            .assigner
            .assign(entity_id, snapshot.as_ref(), VALIDATOR_THRESHOLD)
            .unwrap();
        assignment
            .validators()
            .iter()
            .map(|signer| {
                let (keypair, _) = self
                    .keyed
                    .iter()
                    .find(|(_, account)| account.id == *signer)
                    .unwrap();
                Certificate {
                    signer_id: *signer,
                    signature: *keypair.sign(message).as_bytes(),
                }
            })
            .collect()
    }

    /// A fully certified transaction drawn against the genesis snapshot.
    pub fn validated_transaction(&self) -> ValidatedTransaction {
        let transaction = Transaction {
            reference_block_id: self.genesis_id,
            sender: fixtures::identifier_fixture(),
            receiver: fixtures::identifier_fixture(),
            amount: 21,
            signature: fixtures::signature_fixture(),
        };
        let certificates = self.certify(
            &transaction.id(),
            &transaction.signable_bytes(),
            &self.genesis_id,
        );
        ValidatedTransaction {
            transaction,
            certificates,
        }
    }

    /// A fully certified block at height 2 on top of the tip.
    pub fn block_with(&self, transactions: Vec<ValidatedTransaction>) -> Block {
        let tx_ids: Vec<Identifier> = transactions.iter().map(|tx| tx.id()).collect();
        let (proposer_key, proposer) = &self.keyed[0];
        let mut proposal = BlockProposal {
            header: BlockHeader {
                height: 2,
                previous_block_id: self.tip_id,
                proposer_id: proposer.id,
                payload_merkle_root: merkle_root_of(&tx_ids),
            },
            payload: BlockPayload { transactions },
            proposer_signature: [0u8; 64],
        };
        proposal.proposer_signature = *proposer_key.sign(&proposal.signable_bytes()).as_bytes();

        let mut block = Block {
            proposal,
            certificates: Vec::new(),
        };
        block.certificates =
            self.certify(&block.id(), &block.proposal.signable_bytes(), &self.tip_id);
        block
    }

    /// A certified block carrying `tx_count` fresh transactions.
    pub fn block(&self, tx_count: usize) -> Block {
        self.block_with(
            (0..tx_count)
                .map(|_| self.validated_transaction())
                .collect(),
        )
    }
}

impl Default for ChainRig {
    fn default() -> Self {
        Self::new()
    }
}
