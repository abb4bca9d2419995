//! # BLAKE3 Hashing
//!
//! Fingerprints for certificates and passphrase key derivation.

use zeroize::Zeroizing;

/// BLAKE3 hash output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with BLAKE3 (one-shot).
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Derive a 256-bit key from a domain-separation context and key material.
///
/// The output is wrapped in `Zeroizing` because callers feed passphrases in.
pub fn blake3_derive_key(context: &str, key_material: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    Zeroizing::new(*hasher.finalize().as_bytes())
}
