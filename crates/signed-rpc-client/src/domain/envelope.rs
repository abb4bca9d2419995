//! # Signed Envelope Builder
//!
//! One [`RequestEnvelope`] per call: the encoded JSON-RPC payload, the server
//! clock reading at send time and a fresh UUID. Receivers use the id and
//! timestamp for replay and staleness checks. The envelope is signed once and
//! then only the [`SignedEnvelope`] travels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use shared_crypto::{CryptoError, IdentityCertificate, ProtectedBytes, SignedData};
use uuid::Uuid;

/// Per-call request packet.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// UTF-8 JSON-RPC request bytes.
    #[serde_as(as = "Base64")]
    pub payload: Vec<u8>,
    /// Time reported by the server clock when the call was made.
    pub sent_time: DateTime<Utc>,
    /// Unique packet id, also used as the JSON-RPC request id.
    pub id: Uuid,
}

impl RequestEnvelope {
    /// Build an envelope.
    pub fn new(id: Uuid, payload: Vec<u8>, sent_time: DateTime<Utc>) -> Self {
        Self {
            payload,
            sent_time,
            id,
        }
    }

    /// Sign with `certificate`, exposing the passphrase only for this call.
    ///
    /// The decrypted passphrase lives in a guard scoped to this function and
    /// is wiped on return, whether signing succeeded or not.
    pub fn sign(
        &self,
        certificate: &IdentityCertificate,
        passphrase: &ProtectedBytes,
    ) -> Result<SignedEnvelope, CryptoError> {
        let plaintext = passphrase.temp_plaintext()?;
        SignedData::sign(self, certificate, &plaintext)
    }
}

/// A signed request packet as handed to the transport.
pub type SignedEnvelope = SignedData<RequestEnvelope>;
