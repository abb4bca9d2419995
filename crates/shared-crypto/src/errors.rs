//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, wrong passphrase or tampered data)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Data was signed by a different certificate than the one checked
    #[error("Signer mismatch: expected {expected}, got {actual}")]
    SignerMismatch {
        /// Certificate id the verifier expected
        expected: uuid::Uuid,
        /// Certificate id recorded in the signed data
        actual: uuid::Uuid,
    },

    /// Canonical serialization of signed data failed
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CryptoError {
    fn from(e: serde_json::Error) -> Self {
        CryptoError::Serialization(e.to_string())
    }
}
