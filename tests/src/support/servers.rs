//! In-memory servers implementing the transport port.
//!
//! Each server verifies the signed envelope against the expected client
//! certificate and rejects replayed packet ids before dispatching, so the
//! suite exercises the same checks a real server performs.

use super::Order;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_crypto::PublicCertificate;
use shared_rpc::{codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse, MethodDescriptor};
use signed_rpc_client::{RpcInterface, SignedEnvelope, SignedRequestTransport, TransportError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use uuid::Uuid;

type Handler = Box<dyn Fn(&JsonRpcRequest) -> Result<Value, JsonRpcError> + Send + Sync>;

/// Scriptable server.
pub struct InMemoryServer {
    client: PublicCertificate,
    catalog: Mutex<Vec<MethodDescriptor>>,
    handler: Handler,
    now: DateTime<Utc>,
    seen_ids: Mutex<HashSet<Uuid>>,
    packets: AtomicUsize,
    catalog_calls: AtomicUsize,
    clock_calls: AtomicUsize,
    stalled: AtomicUsize,
    stall_started: Notify,
}

impl InMemoryServer {
    fn new(client: &PublicCertificate, catalog: Vec<MethodDescriptor>, handler: Handler) -> Arc<Self> {
        Arc::new(Self {
            client: client.clone(),
            catalog: Mutex::new(catalog),
            handler,
            now: Utc.with_ymd_and_hms(2031, 6, 1, 12, 0, 0).unwrap(),
            seen_ids: Mutex::new(HashSet::new()),
            packets: AtomicUsize::new(0),
            catalog_calls: AtomicUsize::new(0),
            clock_calls: AtomicUsize::new(0),
            stalled: AtomicUsize::new(0),
            stall_started: Notify::new(),
        })
    }

    /// Echoes params back: none -> null, one -> itself, many -> array.
    /// The `stall` method never answers.
    pub fn mirror(client: &PublicCertificate) -> Arc<Self> {
        Self::new(
            client,
            super::MirrorProxy::method_descriptors(),
            Box::new(|request| {
                Ok(match request.params.as_slice() {
                    [] => Value::Null,
                    [single] => single.clone(),
                    many => Value::Array(many.to_vec()),
                })
            }),
        )
    }

    /// Integer arithmetic; division by zero is a remote error.
    pub fn calculator(client: &PublicCertificate) -> Arc<Self> {
        Self::new(
            client,
            super::CalculatorProxy::method_descriptors(),
            Box::new(|request| {
                let int = |i: usize| {
                    request
                        .params
                        .get(i)
                        .and_then(Value::as_i64)
                        .ok_or_else(|| JsonRpcError::invalid_params(format!("param {i}")))
                };
                match request.method.as_str() {
                    "add" => Ok(json!(int(0)? + int(1)?)),
                    "divide" => {
                        let (a, b) = (int(0)?, int(1)?);
                        if b == 0 {
                            Err(JsonRpcError::new(codes::SERVER_ERROR, "division by zero")
                                .with_data(json!({ "dividend": a })))
                        } else {
                            Ok(json!(a / b))
                        }
                    }
                    "order_total" => {
                        let order: Order = request
                            .params
                            .first()
                            .cloned()
                            .ok_or_else(|| JsonRpcError::invalid_params("missing order"))
                            .and_then(|v| {
                                serde_json::from_value(v)
                                    .map_err(|e| JsonRpcError::invalid_params(e.to_string()))
                            })?;
                        let total: u64 = order
                            .lines
                            .iter()
                            .map(|l| u64::from(l.quantity) * l.unit_price_cents)
                            .sum();
                        Ok(json!(total))
                    }
                    other => Err(JsonRpcError::method_not_found(other)),
                }
            }),
        )
    }

    /// Replace the published catalog.
    pub fn with_catalog(self: Arc<Self>, catalog: Vec<MethodDescriptor>) -> Arc<Self> {
        *self.catalog.lock() = catalog;
        self
    }

    /// Server clock value handed to clients.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn packets(&self) -> usize {
        self.packets.load(Ordering::SeqCst)
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn clock_calls(&self) -> usize {
        self.clock_calls.load(Ordering::SeqCst)
    }

    /// Total transport invocations of any kind.
    pub fn transport_calls(&self) -> usize {
        self.packets() + self.catalog_calls() + self.clock_calls()
    }

    /// Wait until at least `count` calls are parked in `stall`.
    pub async fn wait_for_stalled(&self, count: usize) {
        loop {
            let started = self.stall_started.notified();
            tokio::pin!(started);
            started.as_mut().enable();
            if self.stalled.load(Ordering::SeqCst) >= count {
                return;
            }
            started.await;
        }
    }

    fn respond(&self, packet: &SignedEnvelope) -> Result<JsonRpcResponse, TransportError> {
        let envelope = packet
            .value()
            .map_err(|e| TransportError::Failed(format!("bad envelope: {e}")))?;
        let request: JsonRpcRequest = serde_json::from_slice(&envelope.payload)
            .map_err(|e| TransportError::Failed(format!("bad payload: {e}")))?;

        if packet.verify(&self.client).is_err() {
            return Ok(JsonRpcResponse::failure(
                request.id,
                JsonRpcError::new(codes::UNAUTHORIZED, "bad signature"),
            ));
        }
        if envelope.sent_time != self.now {
            return Ok(JsonRpcResponse::failure(
                request.id,
                JsonRpcError::new(codes::UNAUTHORIZED, "stale packet"),
            ));
        }
        if !self.seen_ids.lock().insert(envelope.id) {
            return Ok(JsonRpcResponse::failure(
                request.id,
                JsonRpcError::new(codes::UNAUTHORIZED, "replayed packet"),
            ));
        }

        Ok(match (self.handler)(&request) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => JsonRpcResponse::failure(request.id, error),
        })
    }
}

#[async_trait]
impl SignedRequestTransport for InMemoryServer {
    async fn process_signed_request_packet(
        &self,
        packet: SignedEnvelope,
    ) -> Result<Vec<u8>, TransportError> {
        self.packets.fetch_add(1, Ordering::SeqCst);

        let stalls = packet
            .value()
            .ok()
            .and_then(|e| serde_json::from_slice::<JsonRpcRequest>(&e.payload).ok())
            .map_or(false, |r| r.method == "stall");
        if stalls {
            self.stalled.fetch_add(1, Ordering::SeqCst);
            self.stall_started.notify_waiters();
            std::future::pending::<()>().await;
        }

        let response = self.respond(&packet)?;
        response
            .to_bytes()
            .map_err(|e| TransportError::Failed(e.to_string()))
    }

    async fn get_method_infos(&self) -> Result<Vec<MethodDescriptor>, TransportError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.catalog.lock().clone())
    }

    async fn get_now_time(&self) -> Result<DateTime<Utc>, TransportError> {
        self.clock_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.now)
    }
}
