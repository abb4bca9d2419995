//! # Proxy Factory
//!
//! Builds the call-through proxy for a target interface at most once per
//! client. Creation runs under a fair async mutex (check, then create), which
//! is only held for the check-and-create step; calls through the finished
//! proxy never touch it.

use crate::pipeline::Invoker;
use crate::ports::inbound::RpcInterface;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Memoized proxy slot.
pub struct ProxyCell<I> {
    slot: Mutex<Option<Arc<I>>>,
}

impl<I: RpcInterface> ProxyCell<I> {
    /// Empty slot.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the proxy, creating it from `invoker` on first use.
    pub async fn get_or_create(&self, invoker: impl FnOnce() -> Invoker) -> Arc<I> {
        let mut slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(proxy) => Arc::clone(proxy),
            None => {
                debug!(interface = I::NAME, "Creating call-through proxy");
                let proxy = Arc::new(I::from_invoker(invoker()));
                *slot = Some(Arc::clone(&proxy));
                proxy
            }
        }
    }
}

impl<I: RpcInterface> Default for ProxyCell<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declare a remote interface and generate its call-through proxy.
///
/// The macro emits an `#[async_trait]` trait with the listed methods, each
/// returning `Result<T, ClientError>`, and a proxy struct that implements the
/// trait and [`RpcInterface`]. Every parameter and return type must implement
/// [`TypeShape`](shared_rpc::TypeShape) and serde.
///
/// ```rust,ignore
/// rpc_interface! {
///     /// Wallet service.
///     pub trait Wallet as WalletProxy {
///         fn balance(account: String) -> u64;
///         fn transfer(from: String, to: String, amount: u64) -> bool;
///         fn ping() -> ();
///     }
/// }
///
/// let proxy = client.get_proxy().await?;
/// let funds = proxy.balance("alice".into()).await?;
/// ```
#[macro_export]
macro_rules! rpc_interface {
    (
        $(#[$trait_meta:meta])*
        $vis:vis trait $trait_name:ident as $proxy:ident {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident ( $( $param:ident : $param_ty:ty ),* $(,)? ) -> $ret:ty ;
            )*
        }
    ) => {
        $(#[$trait_meta])*
        #[$crate::__private::async_trait]
        $vis trait $trait_name: Send + Sync {
            $(
                $(#[$method_meta])*
                async fn $method(&self $(, $param: $param_ty)*) -> $crate::ClientResult<$ret>;
            )*
        }

        #[doc = concat!("Call-through proxy for [`", stringify!($trait_name), "`].")]
        #[derive(Debug, Clone)]
        $vis struct $proxy {
            invoker: $crate::Invoker,
        }

        impl $crate::RpcInterface for $proxy {
            const NAME: &'static str = stringify!($trait_name);

            fn method_descriptors() -> ::std::vec::Vec<$crate::__private::MethodDescriptor> {
                ::std::vec![
                    $(
                        $crate::__private::MethodDescriptor::new(
                            stringify!($method),
                            ::std::vec![
                                $(
                                    $crate::__private::ParamDescriptor::new(
                                        stringify!($param),
                                        <$param_ty as $crate::__private::TypeShape>::shape(),
                                    )
                                ),*
                            ],
                            <$ret as $crate::__private::TypeShape>::shape(),
                        )
                    ),*
                ]
            }

            fn from_invoker(invoker: $crate::Invoker) -> Self {
                Self { invoker }
            }
        }

        #[$crate::__private::async_trait]
        impl $trait_name for $proxy {
            $(
                async fn $method(&self $(, $param: $param_ty)*) -> $crate::ClientResult<$ret> {
                    let call = $crate::MethodCall::new(stringify!($method))
                        $( .arg(&$param)? )*;
                    self.invoker.invoke::<$ret>(call).await
                }
            )*
        }
    };
}
