//! # Proxy Factory Flows
//!
//! However many tasks race for the proxy, exactly one is built and every
//! caller receives it.

#[cfg(test)]
mod tests {
    use crate::support::{connect, init_tracing, Identity, InMemoryServer, Mirror, MirrorProxy};
    use signed_rpc_client::{ClientResult, Invoker, MethodCall, MethodDescriptor, RpcInterface};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    static COUNTING_PROXIES_BUILT: AtomicUsize = AtomicUsize::new(0);

    /// Hand-written adapter that counts how often it is built.
    struct CountingMirror {
        invoker: Invoker,
    }

    impl CountingMirror {
        async fn echo_number(&self, value: u64) -> ClientResult<u64> {
            self.invoker
                .invoke(MethodCall::new("echo_number").arg(&value)?)
                .await
        }
    }

    impl RpcInterface for CountingMirror {
        const NAME: &'static str = "CountingMirror";

        fn method_descriptors() -> Vec<MethodDescriptor> {
            MirrorProxy::method_descriptors()
                .into_iter()
                .filter(|m| m.name == "echo_number")
                .collect()
        }

        fn from_invoker(invoker: Invoker) -> Self {
            COUNTING_PROXIES_BUILT.fetch_add(1, Ordering::SeqCst);
            Self { invoker }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_get_proxy_builds_once() {
        init_tracing();
        let identity = Identity::generate("client");
        let server = InMemoryServer::mirror(identity.certificate.public_certificate());
        let client = Arc::new(connect::<CountingMirror>(&server, &identity).await.unwrap());

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let client = Arc::clone(&client);
                tokio::spawn(async move { client.get_proxy().await })
            })
            .collect();
        let proxies: Vec<Arc<CountingMirror>> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        assert_eq!(COUNTING_PROXIES_BUILT.load(Ordering::SeqCst), 1);
        assert!(proxies.iter().all(|p| Arc::ptr_eq(p, &proxies[0])));

        assert_eq!(proxies[17].echo_number(17).await.unwrap(), 17);
    }

    #[tokio::test]
    async fn test_generated_proxy_is_memoized() {
        init_tracing();
        let identity = Identity::generate("client");
        let server = InMemoryServer::mirror(identity.certificate.public_certificate());
        let client = connect::<MirrorProxy>(&server, &identity).await.unwrap();

        let first = client.get_proxy().await.unwrap();
        let second = client.get_proxy().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.echo_number(3).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_proxy_is_usable_as_trait_object() {
        init_tracing();
        let identity = Identity::generate("client");
        let server = InMemoryServer::mirror(identity.certificate.public_certificate());
        let client = connect::<MirrorProxy>(&server, &identity).await.unwrap();

        let mirror: Arc<dyn Mirror> = client.get_proxy().await.unwrap();

        assert_eq!(mirror.echo_number(8).await.unwrap(), 8);
    }
}
