//! # Signed RPC Client
//!
//! Turns calls on a typed interface into signed JSON-RPC requests sent through
//! a caller-supplied transport, and turns the raw responses back into typed
//! results.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): envelopes, compatibility rules, lifecycle
//!   state machine, cancellation signal, config and errors
//! - **Ports Layer** (`ports/`): the target-interface contract (inbound) and
//!   the transport function set (outbound)
//! - **Pipeline / Proxy** (`pipeline.rs`, `proxy.rs`): one call end to end,
//!   and the memoized call-through proxy
//! - **Service Layer** (`service.rs`): `SignedRpcClient`, which wires it all
//!
//! ## Usage
//!
//! ```rust,ignore
//! rpc_interface! {
//!     pub trait Wallet as WalletProxy {
//!         fn balance(account: String) -> u64;
//!     }
//! }
//!
//! let client = SignedRpcClient::<WalletProxy>::create(
//!     transport, certificate, passphrase, &CancellationSignal::new(), None,
//! ).await?;
//! let wallet = client.get_proxy().await?;
//! let funds = wallet.balance("alice".into()).await?;
//! client.dispose().await;
//! ```
//!
//! ## Security Notes
//!
//! - Every request is signed with the caller's identity certificate
//! - Timestamps come from the server clock, not the local one
//! - The certificate passphrase is decrypted per call and wiped right after signing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod pipeline;
pub mod ports;
pub mod proxy;
pub mod service;

// Re-export public API
pub use domain::cancellation::{CancellationSignal, Cancelled};
pub use domain::compatibility::{check_compatibility, MethodMismatch};
pub use domain::config::{ClientConfig, ConfigError, MetadataFetchConfig};
pub use domain::envelope::{RequestEnvelope, SignedEnvelope};
pub use domain::errors::{ClientError, ClientResult};
pub use domain::lifecycle::{LifecycleGuard, LifecycleState};
pub use pipeline::{InvocationPipeline, Invoker};
pub use ports::inbound::{MethodCall, RpcInterface};
pub use ports::outbound::{SignedRequestTransport, TransportError};
pub use proxy::ProxyCell;
pub use service::SignedRpcClient;
pub use shared_rpc::{impl_type_shape, MethodDescriptor, ParamDescriptor, TypeShape};

#[doc(hidden)]
#[allow(missing_docs)]
pub mod __private {
    pub use async_trait::async_trait;
    pub use shared_rpc::{MethodDescriptor, ParamDescriptor, TypeShape};
}
