//! Crypto error types.

use thiserror::Error;

/// Errors raised by the crypto primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The 32 bytes do not decode to a valid Ed25519 point.
    #[error("invalid public key bytes")]
    InvalidPublicKey,

    /// Signature does not verify over the message with the given key.
    #[error("signature verification failed")]
    SignatureVerificationFailed,
}
