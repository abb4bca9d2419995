//! # Shared Crypto - Signing Collaborator
//!
//! Everything a signed JSON-RPC client needs to prove who it is.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305 | Sealing secrets at rest |
//! | `hashing` | BLAKE3 | Passphrase key derivation |
//! | `signatures` | Ed25519 | Request signing |
//! | `protected` | XChaCha20-Poly1305 | In-memory protected passphrases |
//! | `certificate` | Ed25519 + sealed seed | Client identity |
//! | `signed_data` | Ed25519 over canonical JSON | Signed request packets |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency at signing time
//! - **Sealed seeds**: The signing seed only exists in plaintext inside `sign`
//! - **Scoped plaintext**: Decrypted passphrases are zeroized when their guard drops

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod certificate;
pub mod errors;
pub mod hashing;
pub mod protected;
pub mod signatures;
pub mod signed_data;
pub mod symmetric;

// Re-exports
pub use certificate::{IdentityCertificate, PublicCertificate};
pub use errors::CryptoError;
pub use hashing::{blake3_derive_key, blake3_hash};
pub use protected::{ProtectedBytes, TempPlaintext};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use signed_data::SignedData;
pub use symmetric::{decrypt, encrypt, Nonce, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
