//! # Core Domain Entities
//!
//! The entities gossiped between LightChain nodes, grouped the way they
//! flow through the system.
//!
//! ## Clusters
//!
//! - **Chain**: `Transaction`, `ValidatedTransaction`, `BlockHeader`,
//!   `BlockPayload`, `BlockProposal`, `Block`
//! - **Accounts**: `Account`
//! - **Wire**: `Entity` (the tagged sum type), `HelloMessage`
//!
//! ## Identity
//!
//! Every entity has `id() = SHA3-256(canonical encoding)`. Canonical
//! encodings are built by appending fixed-width fields in declaration
//! order, prefixed with the entity kind tag; signatures are excluded from
//! the preimage of the thing they sign.

use crate::identifier::Identifier;
use crate::params::MIN_STAKE;
use lc_crypto::Sha3Hasher;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

/// A 64-byte Ed25519 signature on the wire.
pub type SignatureBytes = [u8; 64];

/// A 32-byte Ed25519 public key on the wire.
pub type PublicKeyBytes = [u8; 32];

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A certificate: one assigned validator's signature over an entity.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Account id of the signing validator.
    pub signer_id: Identifier,
    /// The validator's signature.
    #[serde_as(as = "Bytes")]
    pub signature: SignatureBytes,
}

/// A token transfer between two accounts.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Block whose snapshot this transaction is drawn against.
    pub reference_block_id: Identifier,
    /// Sender account id.
    pub sender: Identifier,
    /// Receiver account id.
    pub receiver: Identifier,
    /// Transfer amount in base units.
    pub amount: u64,
    /// Sender's signature over the canonical fields.
    #[serde_as(as = "Bytes")]
    pub signature: SignatureBytes,
}

impl Transaction {
    /// Canonical encoding of the signed fields; the signature itself is
    /// excluded from its own preimage.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + 32 * 3 + 8);
        bytes.push(EntityKind::Transaction.tag());
        bytes.extend_from_slice(self.reference_block_id.as_bytes());
        bytes.extend_from_slice(self.sender.as_bytes());
        bytes.extend_from_slice(self.receiver.as_bytes());
        bytes.extend_from_slice(&self.amount.to_le_bytes());
        bytes
    }

    /// Compute the transaction identifier.
    pub fn id(&self) -> Identifier {
        let mut hasher = Sha3Hasher::new();
        hasher.update(&self.signable_bytes());
        Identifier::from(hasher.finalize())
    }
}

/// A transaction that has gathered a quorum of validator certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedTransaction {
    /// The underlying transaction.
    pub transaction: Transaction,
    /// Certificates from the assigned validators.
    pub certificates: Vec<Certificate>,
}

impl ValidatedTransaction {
    /// Identifier of a validated transaction is the identifier of the
    /// transaction it certifies.
    pub fn id(&self) -> Identifier {
        self.transaction.id()
    }

    /// Message the validator certificates sign over.
    pub fn signable_bytes(&self) -> Vec<u8> {
        self.transaction.signable_bytes()
    }

    /// Reference block of the underlying transaction.
    pub fn reference_block_id(&self) -> Identifier {
        self.transaction.reference_block_id
    }
}

/// Metadata of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Height of this block in the chain.
    pub height: u64,
    /// Identifier of the parent block.
    pub previous_block_id: Identifier,
    /// Account id of the proposer.
    pub proposer_id: Identifier,
    /// Merkle root over the payload transaction ids.
    pub payload_merkle_root: Identifier,
}

impl BlockHeader {
    fn write_canonical(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(self.previous_block_id.as_bytes());
        bytes.extend_from_slice(self.proposer_id.as_bytes());
        bytes.extend_from_slice(self.payload_merkle_root.as_bytes());
    }
}

/// The ordered list of validated transactions a proposal carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    /// Transactions in proposal order.
    pub transactions: Vec<ValidatedTransaction>,
}

/// A proposer-signed candidate block.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockProposal {
    /// Block metadata.
    pub header: BlockHeader,
    /// Proposed transactions.
    pub payload: BlockPayload,
    /// Proposer's signature over the canonical header and payload.
    #[serde_as(as = "Bytes")]
    pub proposer_signature: SignatureBytes,
}

impl BlockProposal {
    /// Canonical encoding of header and payload; this is the message the
    /// proposer and the assigned validators sign.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + 8 + 32 * 3 + 32 * self.payload.transactions.len());
        bytes.push(EntityKind::BlockProposal.tag());
        self.header.write_canonical(&mut bytes);
        for tx in &self.payload.transactions {
            bytes.extend_from_slice(tx.id().as_bytes());
        }
        bytes
    }

    /// Compute the proposal identifier.
    pub fn id(&self) -> Identifier {
        let mut hasher = Sha3Hasher::new();
        hasher.update(&self.signable_bytes());
        hasher.update(&self.proposer_signature);
        Identifier::from(hasher.finalize())
    }
}

/// A proposal that has gathered a quorum of validator certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The certified proposal.
    pub proposal: BlockProposal,
    /// Certificates from the assigned validators.
    pub certificates: Vec<Certificate>,
}

impl Block {
    /// Compute the block identifier.
    ///
    /// Certificates are excluded from the preimage: they sign the
    /// proposal, and validators are assigned against the block identifier
    /// before any certificate exists. Two certificate sets over the same
    /// proposal name the same block.
    pub fn id(&self) -> Identifier {
        let mut hasher = Sha3Hasher::new();
        hasher.update(&[EntityKind::Block.tag()]);
        hasher.update(&self.proposal.signable_bytes());
        hasher.update(&self.proposal.proposer_signature);
        Identifier::from(hasher.finalize())
    }

    /// Height of this block.
    pub fn height(&self) -> u64 {
        self.proposal.header.height
    }

    /// Identifier of the parent block.
    pub fn previous_block_id(&self) -> Identifier {
        self.proposal.header.previous_block_id
    }

    /// Transactions carried by this block, in proposal order.
    pub fn transactions(&self) -> &[ValidatedTransaction] {
        &self.proposal.payload.transactions
    }
}

// =============================================================================
// CLUSTER B: ACCOUNTS
// =============================================================================

/// An account at a given snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: Identifier,
    /// Ed25519 public key verifying this account's signatures.
    pub public_key: PublicKeyBytes,
    /// Balance in base units.
    pub balance: u64,
    /// Stake in base units, measured at the snapshot of interest.
    pub stake: u64,
    /// Identifier of the last block this account appeared in.
    pub last_block_id: Identifier,
}

impl Account {
    /// Whether this account may act as a validator at its snapshot.
    pub fn is_staked(&self) -> bool {
        self.stake >= MIN_STAKE
    }
}

// =============================================================================
// CLUSTER C: THE WIRE
// =============================================================================

/// Demo hello traffic exchanged on the broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloMessage {
    /// Node that sent the hello.
    pub sender_id: Identifier,
    /// Free-form greeting.
    pub content: String,
}

impl HelloMessage {
    /// Compute the message identifier.
    pub fn id(&self) -> Identifier {
        let mut hasher = Sha3Hasher::new();
        hasher.update(&[EntityKind::Hello.tag()]);
        hasher.update(self.sender_id.as_bytes());
        hasher.update(self.content.as_bytes());
        Identifier::from(hasher.finalize())
    }
}

/// Kind discriminant of an [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Transaction,
    ValidatedTransaction,
    BlockProposal,
    Block,
    Hello,
}

impl EntityKind {
    /// Canonical-encoding domain-separation tag.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Transaction => 0x01,
            Self::ValidatedTransaction => 0x02,
            Self::BlockProposal => 0x03,
            Self::Block => 0x04,
            Self::Hello => 0x05,
        }
    }
}

/// Any message that flows through the system.
///
/// Engines switch on the variant; kinds an engine does not accept are
/// rejected at its `process` boundary rather than at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Transaction(Transaction),
    ValidatedTransaction(ValidatedTransaction),
    BlockProposal(BlockProposal),
    Block(Block),
    Hello(HelloMessage),
}

impl Entity {
    /// Identifier of the wrapped entity.
    pub fn id(&self) -> Identifier {
        match self {
            Self::Transaction(tx) => tx.id(),
            Self::ValidatedTransaction(tx) => tx.id(),
            Self::BlockProposal(proposal) => proposal.id(),
            Self::Block(block) => block.id(),
            Self::Hello(hello) => hello.id(),
        }
    }

    /// Kind discriminant.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Transaction(_) => EntityKind::Transaction,
            Self::ValidatedTransaction(_) => EntityKind::ValidatedTransaction,
            Self::BlockProposal(_) => EntityKind::BlockProposal,
            Self::Block(_) => EntityKind::Block,
            Self::Hello(_) => EntityKind::Hello,
        }
    }
}
