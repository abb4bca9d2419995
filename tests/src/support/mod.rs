//! Shared fixtures for the integration suite.

pub mod servers;

use serde::{Deserialize, Serialize};
use shared_crypto::{IdentityCertificate, ProtectedBytes};
use signed_rpc_client::{impl_type_shape, rpc_interface};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub use servers::InMemoryServer;

/// Passphrase used by every test identity.
pub const PASSPHRASE: &[u8] = b"integration-passphrase";

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A client identity: certificate plus its protected passphrase.
pub struct Identity {
    pub certificate: Arc<IdentityCertificate>,
    pub passphrase: Arc<ProtectedBytes>,
}

impl Identity {
    pub fn generate(name: &str) -> Self {
        Self {
            certificate: Arc::new(IdentityCertificate::generate(name, PASSPHRASE).unwrap()),
            passphrase: Arc::new(ProtectedBytes::new(PASSPHRASE).unwrap()),
        }
    }
}

/// A structured argument for complex-object calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer: String,
    pub lines: Vec<OrderLine>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: u32,
    pub unit_price_cents: u64,
}

impl_type_shape!(Order, OrderLine);

impl Order {
    pub fn sample() -> Self {
        Self {
            id: 9001,
            customer: "ada".into(),
            lines: vec![
                OrderLine {
                    sku: "KB-01".into(),
                    quantity: 2,
                    unit_price_cents: 4_999,
                },
                OrderLine {
                    sku: "MS-07".into(),
                    quantity: 1,
                    unit_price_cents: 2_500,
                },
            ],
            note: Some("gift wrap".into()),
        }
    }
}

rpc_interface! {
    /// Everything sent is sent back.
    pub trait Mirror as MirrorProxy {
        fn ping() -> ();
        fn echo_number(value: u64) -> u64;
        fn echo_order(order: Order) -> Order;
        /// Never answered by the in-memory server.
        fn stall(tag: String) -> String;
    }
}

rpc_interface! {
    /// Arithmetic with a remote failure mode.
    pub trait Calculator as CalculatorProxy {
        fn add(a: i64, b: i64) -> i64;
        fn divide(a: i64, b: i64) -> i64;
        fn order_total(order: Order) -> u64;
    }
}

/// Build an operational client for `I` against `server`.
pub async fn connect<I: signed_rpc_client::RpcInterface>(
    server: &Arc<InMemoryServer>,
    identity: &Identity,
) -> signed_rpc_client::ClientResult<signed_rpc_client::SignedRpcClient<I>> {
    signed_rpc_client::SignedRpcClient::<I>::create(
        Arc::clone(server) as Arc<dyn signed_rpc_client::SignedRequestTransport>,
        Arc::clone(&identity.certificate),
        Arc::clone(&identity.passphrase),
        &signed_rpc_client::CancellationSignal::new(),
        None,
    )
    .await
}
