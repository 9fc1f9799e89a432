//! # Test Fixtures
//!
//! Random-entity builders shared by unit and integration tests across the
//! workspace. Certificates produced here are random bytes; tests that
//! exercise real signature verification build their certificates from
//! [`keyed_account_fixture`] keypairs instead.

use crate::entities::{
    Account, Block, BlockHeader, BlockPayload, BlockProposal, Certificate, HelloMessage,
    SignatureBytes, Transaction, ValidatedTransaction,
};
use crate::identifier::Identifier;
use crate::params::SIGNATURE_THRESHOLD;
use lc_crypto::KeyPair;
use rand::{Rng, RngCore};

/// A random identifier.
pub fn identifier_fixture() -> Identifier {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Identifier::from_bytes(bytes)
}

/// A random 64-byte signature placeholder.
pub fn signature_fixture() -> SignatureBytes {
    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// A certificate from a random (non-verifiable) signer.
pub fn certificate_fixture() -> Certificate {
    Certificate {
        signer_id: identifier_fixture(),
        signature: signature_fixture(),
    }
}

/// An account with the given stake and a random (non-verifiable) key.
pub fn account_fixture(stake: u64) -> Account {
    let mut public_key = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut public_key);
    Account {
        id: identifier_fixture(),
        public_key,
        balance: rand::thread_rng().gen_range(0..1_000_000),
        stake,
        last_block_id: identifier_fixture(),
    }
}

/// An account backed by a real keypair, for signature-verifying tests.
pub fn keyed_account_fixture(stake: u64) -> (KeyPair, Account) {
    let keypair = KeyPair::generate();
    let account = Account {
        id: identifier_fixture(),
        public_key: *keypair.public_key().as_bytes(),
        balance: rand::thread_rng().gen_range(0..1_000_000),
        stake,
        last_block_id: identifier_fixture(),
    };
    (keypair, account)
}

/// A random transaction.
pub fn transaction_fixture() -> Transaction {
    Transaction {
        reference_block_id: identifier_fixture(),
        sender: identifier_fixture(),
        receiver: identifier_fixture(),
        amount: rand::thread_rng().gen_range(1..10_000),
        signature: signature_fixture(),
    }
}

/// A random validated transaction with a threshold of placeholder
/// certificates.
pub fn validated_transaction_fixture() -> ValidatedTransaction {
    ValidatedTransaction {
        transaction: transaction_fixture(),
        certificates: (0..SIGNATURE_THRESHOLD)
            .map(|_| certificate_fixture())
            .collect(),
    }
}

/// `count` random validated transactions.
pub fn validated_transactions_fixture(count: usize) -> Vec<ValidatedTransaction> {
    (0..count).map(|_| validated_transaction_fixture()).collect()
}

/// A random block header.
pub fn block_header_fixture() -> BlockHeader {
    BlockHeader {
        height: rand::thread_rng().gen_range(1..1_000_000),
        previous_block_id: identifier_fixture(),
        proposer_id: identifier_fixture(),
        payload_merkle_root: identifier_fixture(),
    }
}

/// A random block proposal carrying `tx_count` validated transactions.
pub fn block_proposal_fixture(tx_count: usize) -> BlockProposal {
    BlockProposal {
        header: block_header_fixture(),
        payload: BlockPayload {
            transactions: validated_transactions_fixture(tx_count),
        },
        proposer_signature: signature_fixture(),
    }
}

/// A random block carrying `tx_count` validated transactions and a
/// threshold of placeholder certificates.
pub fn block_fixture(tx_count: usize) -> Block {
    Block {
        proposal: block_proposal_fixture(tx_count),
        certificates: (0..SIGNATURE_THRESHOLD)
            .map(|_| certificate_fixture())
            .collect(),
    }
}

/// A random hello message.
pub fn hello_fixture() -> HelloMessage {
    HelloMessage {
        sender_id: identifier_fixture(),
        content: format!("hello #{}", rand::thread_rng().gen_range(0..u32::MAX)),
    }
}
