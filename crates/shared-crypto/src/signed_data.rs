//! # Signed Data
//!
//! `SignedData<T>` carries a value in canonical JSON form together with the
//! signer's certificate id and an Ed25519 signature over those bytes. The
//! receiver verifies against the signer's [`PublicCertificate`] before it
//! ever deserializes the value.

use crate::certificate::{IdentityCertificate, PublicCertificate};
use crate::signatures::Ed25519Signature;
use crate::CryptoError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use std::marker::PhantomData;
use uuid::Uuid;

/// A value of type `T` signed by an identity certificate.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SignedData<T> {
    /// Canonical JSON encoding of the signed value.
    #[serde_as(as = "Base64")]
    data: Vec<u8>,
    /// Certificate id of the signer.
    signer_id: Uuid,
    /// Signature over `data`.
    signature: Ed25519Signature,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize> SignedData<T> {
    /// Serialize `value` and sign it with `certificate`.
    ///
    /// `passphrase` is only borrowed for the duration of the call.
    pub fn sign(
        value: &T,
        certificate: &IdentityCertificate,
        passphrase: &[u8],
    ) -> Result<Self, CryptoError> {
        let data = serde_json::to_vec(value)?;
        let signature = certificate.sign(&data, passphrase)?;
        Ok(Self {
            data,
            signer_id: certificate.id(),
            signature,
            _marker: PhantomData,
        })
    }
}

impl<T> SignedData<T> {
    /// Certificate id recorded by the signer.
    pub fn signer_id(&self) -> Uuid {
        self.signer_id
    }

    /// The signature bytes.
    pub fn signature(&self) -> &Ed25519Signature {
        &self.signature
    }

    /// Raw signed bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Check the signature against `certificate`.
    pub fn verify(&self, certificate: &PublicCertificate) -> Result<(), CryptoError> {
        if certificate.id != self.signer_id {
            return Err(CryptoError::SignerMismatch {
                expected: certificate.id,
                actual: self.signer_id,
            });
        }
        certificate.verify(&self.data, &self.signature)
    }
}

impl<T: DeserializeOwned> SignedData<T> {
    /// Deserialize the signed value. Does not verify; call [`verify`](Self::verify) first.
    pub fn value(&self) -> Result<T, CryptoError> {
        Ok(serde_json::from_slice(&self.data)?)
    }
}
