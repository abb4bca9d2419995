//! # Protected Secrets
//!
//! A byte secret (typically a certificate passphrase) kept encrypted in memory
//! under a random per-instance session key. Plaintext access is scoped: the
//! caller receives a [`TempPlaintext`] guard and the decrypted copy is zeroized
//! when that guard drops, including on early returns and panics.
//!
//! ```rust,ignore
//! let pass = ProtectedBytes::new(b"hunter2")?;
//! {
//!     let plain = pass.temp_plaintext()?;
//!     certificate.sign(message, &plain)?;
//! } // plaintext wiped here
//! ```

use crate::symmetric::{decrypt, encrypt, Nonce, SecretKey};
use crate::CryptoError;
use std::fmt;
use std::ops::Deref;
use zeroize::Zeroizing;

/// A secret held encrypted in memory.
///
/// Shared read-only between concurrent callers; every call to
/// [`temp_plaintext`](Self::temp_plaintext) decrypts an independent copy.
pub struct ProtectedBytes {
    session_key: SecretKey,
    ciphertext: Vec<u8>,
    nonce: Nonce,
}

impl ProtectedBytes {
    /// Seal `plaintext` under a fresh session key.
    pub fn new(plaintext: &[u8]) -> Result<Self, CryptoError> {
        let session_key = SecretKey::generate();
        let (ciphertext, nonce) = encrypt(&session_key, plaintext)?;
        Ok(Self {
            session_key,
            ciphertext,
            nonce,
        })
    }

    /// Decrypt a short-lived plaintext copy.
    pub fn temp_plaintext(&self) -> Result<TempPlaintext, CryptoError> {
        let plaintext = decrypt(&self.session_key, &self.ciphertext, &self.nonce)?;
        Ok(TempPlaintext(Zeroizing::new(plaintext)))
    }
}

impl fmt::Debug for ProtectedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtectedBytes")
            .field("len", &self.ciphertext.len().saturating_sub(16))
            .finish_non_exhaustive()
    }
}

/// Scoped plaintext view of a [`ProtectedBytes`]. Zeroized on drop.
pub struct TempPlaintext(Zeroizing<Vec<u8>>);

impl TempPlaintext {
    /// The plaintext bytes.
    pub fn data(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for TempPlaintext {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TempPlaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TempPlaintext(..)")
    }
}
