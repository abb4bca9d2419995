//! # Identity Certificates
//!
//! A lightweight client certificate: an Ed25519 public key bound to a
//! certificate id and name, plus the private seed sealed under a key derived
//! from the owner's passphrase. The private half never leaves the struct in
//! plaintext; [`IdentityCertificate::sign`] unseals it for exactly one
//! signature.

use crate::hashing::{blake3_derive_key, blake3_hash, Hash};
use crate::signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use crate::symmetric::{decrypt, encrypt, Nonce, SecretKey};
use crate::CryptoError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// BLAKE3 domain separator for sealing certificate seeds.
const SEED_SEALING_CONTEXT: &str = "signed-rpc 2024-01-01 certificate seed sealing";

/// Salt length for passphrase key derivation.
const SALT_LEN: usize = 16;

/// Public half of a certificate, safe to hand to servers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCertificate {
    /// Certificate id.
    pub id: Uuid,
    /// Human-readable owner name.
    pub name: String,
    /// Signature verification key.
    pub public_key: Ed25519PublicKey,
}

impl PublicCertificate {
    /// Verify a signature produced by the matching [`IdentityCertificate`].
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        self.public_key.verify(message, signature)
    }

    /// BLAKE3 fingerprint over id and public key.
    pub fn fingerprint(&self) -> Hash {
        let mut material = Vec::with_capacity(16 + 32);
        material.extend_from_slice(self.id.as_bytes());
        material.extend_from_slice(self.public_key.as_bytes());
        blake3_hash(&material)
    }
}

/// A certificate with its passphrase-sealed private seed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentityCertificate {
    public: PublicCertificate,
    salt: [u8; SALT_LEN],
    sealed_seed: Vec<u8>,
    seed_nonce: Nonce,
}

impl IdentityCertificate {
    /// Generate a fresh identity protected by `passphrase`.
    pub fn generate(name: impl Into<String>, passphrase: &[u8]) -> Result<Self, CryptoError> {
        let keypair = Ed25519KeyPair::generate();

        let mut salt = [0u8; SALT_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut salt);

        let key = seal_key(&salt, passphrase);
        let (sealed_seed, seed_nonce) = encrypt(&key, keypair.to_seed().as_ref())?;

        Ok(Self {
            public: PublicCertificate {
                id: Uuid::new_v4(),
                name: name.into(),
                public_key: keypair.public_key(),
            },
            salt,
            sealed_seed,
            seed_nonce,
        })
    }

    /// Certificate id.
    pub fn id(&self) -> Uuid {
        self.public.id
    }

    /// Public half of this certificate.
    pub fn public_certificate(&self) -> &PublicCertificate {
        &self.public
    }

    /// Sign `message`, unsealing the private seed with `passphrase`.
    ///
    /// # Errors
    ///
    /// `CryptoError::DecryptionFailed` if the passphrase is wrong.
    pub fn sign(&self, message: &[u8], passphrase: &[u8]) -> Result<Ed25519Signature, CryptoError> {
        let key = seal_key(&self.salt, passphrase);
        let seed = Zeroizing::new(decrypt(&key, &self.sealed_seed, &self.seed_nonce)?);
        let keypair = Ed25519KeyPair::from_seed_slice(&seed)?;
        Ok(keypair.sign(message))
    }
}

fn seal_key(salt: &[u8; SALT_LEN], passphrase: &[u8]) -> SecretKey {
    let mut material = Zeroizing::new(Vec::with_capacity(SALT_LEN + passphrase.len()));
    material.extend_from_slice(salt);
    material.extend_from_slice(passphrase);
    SecretKey::from_bytes(*blake3_derive_key(SEED_SEALING_CONTEXT, &material))
}
