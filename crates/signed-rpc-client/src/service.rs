//! # Signed RPC Client Service
//!
//! Application service tying the pieces together:
//!
//! - construction fetches (or accepts) the server catalog, validates it
//!   against the target interface and only then turns operational
//! - [`SignedRpcClient::get_proxy`] hands out the memoized proxy
//! - [`SignedRpcClient::dispose`] fires the cancellation signal and waits
//!   for in-flight calls before reporting `Disposed`

use crate::domain::cancellation::CancellationSignal;
use crate::domain::compatibility::check_compatibility;
use crate::domain::config::{ClientConfig, MetadataFetchConfig};
use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::lifecycle::{LifecycleGuard, LifecycleState};
use crate::pipeline::{InvocationPipeline, Invoker};
use crate::ports::inbound::RpcInterface;
use crate::ports::outbound::SignedRequestTransport;
use crate::proxy::ProxyCell;
use shared_crypto::{IdentityCertificate, ProtectedBytes};
use shared_rpc::MethodDescriptor;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client transport for the target interface `I`.
pub struct SignedRpcClient<I: RpcInterface> {
    pipeline: Arc<InvocationPipeline>,
    lifecycle: Arc<LifecycleGuard>,
    cancellation: CancellationSignal,
    proxy: ProxyCell<I>,
}

impl<I: RpcInterface> SignedRpcClient<I> {
    /// Create a client with the default configuration.
    ///
    /// `cancellation` only guards construction (the catalog fetch). Calls made
    /// later are governed by the client's own signal, fired by `dispose`.
    ///
    /// # Errors
    ///
    /// - `ClientError::Incompatible` if `I` does not match the server catalog
    /// - `ClientError::MetadataFetch` if the catalog fetch fails with a non-timeout error
    /// - `ClientError::Cancelled` if `cancellation` fires during the fetch
    pub async fn create(
        transport: Arc<dyn SignedRequestTransport>,
        certificate: Arc<IdentityCertificate>,
        passphrase: Arc<ProtectedBytes>,
        cancellation: &CancellationSignal,
        catalog: Option<Vec<MethodDescriptor>>,
    ) -> ClientResult<Self> {
        Self::create_with_config(
            transport,
            certificate,
            passphrase,
            cancellation,
            catalog,
            ClientConfig::default(),
        )
        .await
    }

    /// Create a client with an explicit configuration.
    pub async fn create_with_config(
        transport: Arc<dyn SignedRequestTransport>,
        certificate: Arc<IdentityCertificate>,
        passphrase: Arc<ProtectedBytes>,
        cancellation: &CancellationSignal,
        catalog: Option<Vec<MethodDescriptor>>,
        config: ClientConfig,
    ) -> ClientResult<Self> {
        config.validate()?;

        let lifecycle = Arc::new(LifecycleGuard::new(config.object_name.clone()));
        let signal = CancellationSignal::new();

        let catalog = match catalog {
            Some(catalog) => catalog,
            None => {
                fetch_catalog(
                    transport.as_ref(),
                    &config.metadata_fetch,
                    cancellation,
                    &config.object_name,
                )
                .await?
            }
        };

        check_compatibility(&I::method_descriptors(), &catalog).map_err(|mismatches| {
            for mismatch in &mismatches {
                warn!(object = %config.object_name, interface = I::NAME, %mismatch, "Interface mismatch");
            }
            ClientError::Incompatible {
                interface: I::NAME,
                mismatches,
            }
        })?;

        let pipeline = Arc::new(InvocationPipeline::new(
            transport,
            certificate,
            passphrase,
            Arc::clone(&lifecycle),
            signal.clone(),
        ));

        lifecycle.mark_operational()?;
        info!(object = %config.object_name, interface = I::NAME, "Signed RPC client ready");

        Ok(Self {
            pipeline,
            lifecycle,
            cancellation: signal,
            proxy: ProxyCell::new(),
        })
    }

    /// The memoized call-through proxy, created on first use.
    pub async fn get_proxy(&self) -> ClientResult<Arc<I>> {
        let _permit = self.lifecycle.enter()?;
        let pipeline = &self.pipeline;
        Ok(self
            .proxy
            .get_or_create(|| Invoker::new(Arc::clone(pipeline)))
            .await)
    }

    /// Tear the client down.
    ///
    /// The first call fires the cancellation signal. Every call, first or
    /// not, then waits for in-flight operations to finish, releases the
    /// signing credentials and marks the client `Disposed`, so a caller that
    /// abandons its `dispose` future leaves the work to the next one.
    pub async fn dispose(&self) {
        if self.lifecycle.begin_dispose() {
            info!(
                object = %self.lifecycle.object(),
                in_flight = self.lifecycle.in_flight(),
                "Disposing signed RPC client"
            );
            self.cancellation.cancel();
        }

        self.lifecycle.drained().await;
        if self.pipeline.release_credentials() {
            debug!(object = %self.lifecycle.object(), "Released signing credentials");
        }
        if self.lifecycle.mark_disposed() {
            debug!(object = %self.lifecycle.object(), "Signed RPC client disposed");
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// The signal fired by `dispose`.
    pub fn cancellation(&self) -> &CancellationSignal {
        &self.cancellation
    }
}

impl<I: RpcInterface> Drop for SignedRpcClient<I> {
    fn drop(&mut self) {
        // Stop calls still running through cloned proxies.
        self.cancellation.cancel();
        self.pipeline.release_credentials();
    }
}

impl<I: RpcInterface> fmt::Debug for SignedRpcClient<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRpcClient")
            .field("interface", &I::NAME)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

/// Fetch the server catalog, retrying timeouts per `policy`.
async fn fetch_catalog(
    transport: &dyn SignedRequestTransport,
    policy: &MetadataFetchConfig,
    cancellation: &CancellationSignal,
    object: &str,
) -> ClientResult<Vec<MethodDescriptor>> {
    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        let outcome = cancellation
            .run_until_cancelled(transport.get_method_infos())
            .await
            .map_err(|_| ClientError::Cancelled)?;

        match outcome {
            Ok(catalog) => {
                debug!(object, attempts, methods = catalog.len(), "Fetched method catalog");
                return Ok(catalog);
            }
            Err(e) if e.is_timeout() => {
                if !policy.allows_retry(attempts) {
                    return Err(ClientError::MetadataFetchExhausted { attempts });
                }
                let backoff = policy.backoff_after(attempts);
                warn!(object, attempt = attempts, ?backoff, "Method catalog fetch timed out, retrying");
                if !backoff.is_zero() {
                    cancellation
                        .run_until_cancelled(tokio::time::sleep(backoff))
                        .await
                        .map_err(|_| ClientError::Cancelled)?;
                }
            }
            Err(e) => return Err(ClientError::MetadataFetch(e)),
        }
    }
}
