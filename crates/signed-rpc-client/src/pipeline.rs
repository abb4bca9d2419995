//! # Invocation Pipeline
//!
//! One remote call end to end:
//!
//! 1. encode the call as a JSON-RPC request
//! 2. read the server clock through the transport
//! 3. build a [`RequestEnvelope`] with a fresh id
//! 4. sign it under a scoped passphrase copy
//! 5. send it, racing the shared cancellation signal
//! 6. decode the response into the expected return type
//!
//! The lifecycle state is checked once on entry. A disposal that starts
//! mid-call reaches the call through the cancellation signal instead.

use crate::domain::cancellation::CancellationSignal;
use crate::domain::envelope::RequestEnvelope;
use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::lifecycle::LifecycleGuard;
use crate::ports::inbound::MethodCall;
use crate::ports::outbound::SignedRequestTransport;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use shared_crypto::{IdentityCertificate, ProtectedBytes};
use shared_rpc::{decode_response, encode_request, DecodeError, JsonRpcId, JsonRpcRequest};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Signing identity held until disposal.
struct Credentials {
    certificate: Arc<IdentityCertificate>,
    passphrase: Arc<ProtectedBytes>,
}

/// Everything a call needs, shared read-only by all concurrent calls.
pub struct InvocationPipeline {
    transport: Arc<dyn SignedRequestTransport>,
    credentials: Mutex<Option<Credentials>>,
    lifecycle: Arc<LifecycleGuard>,
    cancellation: CancellationSignal,
}

impl InvocationPipeline {
    /// Wire a pipeline.
    pub fn new(
        transport: Arc<dyn SignedRequestTransport>,
        certificate: Arc<IdentityCertificate>,
        passphrase: Arc<ProtectedBytes>,
        lifecycle: Arc<LifecycleGuard>,
        cancellation: CancellationSignal,
    ) -> Self {
        Self {
            transport,
            credentials: Mutex::new(Some(Credentials {
                certificate,
                passphrase,
            })),
            lifecycle,
            cancellation,
        }
    }

    /// Drop the pipeline's hold on the certificate and passphrase.
    ///
    /// Returns `true` if they were still held. Calls admitted afterwards fail
    /// with a lifecycle error.
    pub fn release_credentials(&self) -> bool {
        self.credentials.lock().take().is_some()
    }

    /// Run one call and decode its result as `R`.
    pub async fn invoke<R: DeserializeOwned>(&self, call: MethodCall) -> ClientResult<R> {
        let _permit = self.lifecycle.enter()?;

        let (method, params) = call.into_parts();
        let request_id = Uuid::new_v4();
        let rpc_id = JsonRpcId::from(request_id);

        debug!(method = %method, request_id = %request_id, "Invoking remote method");

        let payload = encode_request(&JsonRpcRequest::new(rpc_id.clone(), method.as_str(), params))
            .map_err(|e| ClientError::invocation(&method, e))?;

        let sent_time = self
            .cancellation
            .run_until_cancelled(self.transport.get_now_time())
            .await
            .map_err(|_| self.cancelled(&method, request_id))?
            .map_err(|e| ClientError::invocation(&method, e))?;

        let signed = {
            let (certificate, passphrase) = self.credentials()?;
            RequestEnvelope::new(request_id, payload, sent_time).sign(&certificate, &passphrase)?
        };

        let raw = self
            .cancellation
            .run_until_cancelled(self.transport.process_signed_request_packet(signed))
            .await
            .map_err(|_| self.cancelled(&method, request_id))?
            .map_err(|e| ClientError::invocation(&method, e))?;

        debug!(
            method = %method,
            request_id = %request_id,
            response_len = raw.len(),
            "Received response"
        );

        decode_response(&raw, &rpc_id).map_err(|e| match e {
            DecodeError::Remote(error) => ClientError::Remote { method, error },
            other => ClientError::invocation(&method, other),
        })
    }

    fn credentials(&self) -> ClientResult<(Arc<IdentityCertificate>, Arc<ProtectedBytes>)> {
        match self.credentials.lock().as_ref() {
            Some(c) => Ok((Arc::clone(&c.certificate), Arc::clone(&c.passphrase))),
            None => Err(ClientError::Lifecycle {
                object: self.lifecycle.object().to_string(),
                state: self.lifecycle.state(),
            }),
        }
    }

    fn cancelled(&self, method: &str, request_id: Uuid) -> ClientError {
        warn!(
            object = %self.lifecycle.object(),
            method = %method,
            request_id = %request_id,
            "Call cancelled"
        );
        ClientError::Cancelled
    }
}

/// Cheap, cloneable handle proxies use to reach the pipeline.
#[derive(Clone)]
pub struct Invoker {
    pipeline: Arc<InvocationPipeline>,
}

impl Invoker {
    pub(crate) fn new(pipeline: Arc<InvocationPipeline>) -> Self {
        Self { pipeline }
    }

    /// Forward `call` and decode the result as `R`.
    pub async fn invoke<R: DeserializeOwned>(&self, call: MethodCall) -> ClientResult<R> {
        self.pipeline.invoke(call).await
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("object", &self.pipeline.lifecycle.object())
            .finish()
    }
}
