//! # Compatibility Flows
//!
//! Construction refuses catalogs that cannot serve the target interface.

#[cfg(test)]
mod tests {
    use crate::support::{connect, init_tracing, Identity, InMemoryServer, Mirror, MirrorProxy};
    use signed_rpc_client::{
        CancellationSignal, ClientError, MethodDescriptor, MethodMismatch, ParamDescriptor,
        RpcInterface, SignedRequestTransport, SignedRpcClient,
    };
    use std::sync::Arc;

    fn mirror_catalog_without(method: &str) -> Vec<MethodDescriptor> {
        MirrorProxy::method_descriptors()
            .into_iter()
            .filter(|m| m.name != method)
            .collect()
    }

    #[tokio::test]
    async fn test_missing_method_is_incompatible() {
        init_tracing();
        let identity = Identity::generate("client");
        let server = InMemoryServer::mirror(identity.certificate.public_certificate())
            .with_catalog(mirror_catalog_without("echo_order"));

        let err = connect::<MirrorProxy>(&server, &identity).await.unwrap_err();

        match err {
            ClientError::Incompatible {
                interface,
                mismatches,
            } => {
                assert_eq!(interface, "Mirror");
                assert_eq!(
                    mismatches,
                    vec![MethodMismatch::Missing {
                        method: "echo_order".into()
                    }]
                );
            }
            other => panic!("expected incompatibility, got {other:?}"),
        }
        assert_eq!(server.packets(), 0);
    }

    #[tokio::test]
    async fn test_return_type_mismatch_is_incompatible() {
        init_tracing();
        let identity = Identity::generate("client");
        let mut catalog = mirror_catalog_without("echo_number");
        catalog.push(MethodDescriptor::new(
            "echo_number",
            vec![ParamDescriptor::new("value", "u64")],
            "string",
        ));
        let server = InMemoryServer::mirror(identity.certificate.public_certificate())
            .with_catalog(catalog);

        let err = connect::<MirrorProxy>(&server, &identity).await.unwrap_err();

        match err {
            ClientError::Incompatible { mismatches, .. } => {
                assert_eq!(mismatches.len(), 1);
                assert!(matches!(
                    &mismatches[0],
                    MethodMismatch::Returns { method, .. } if method == "echo_number"
                ));
            }
            other => panic!("expected incompatibility, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_renamed_parameters_are_compatible() {
        init_tracing();
        let identity = Identity::generate("client");
        let mut catalog = mirror_catalog_without("echo_number");
        catalog.push(MethodDescriptor::new(
            "echo_number",
            vec![ParamDescriptor::new("n", "u64")],
            "u64",
        ));
        let server = InMemoryServer::mirror(identity.certificate.public_certificate())
            .with_catalog(catalog);

        let client = connect::<MirrorProxy>(&server, &identity).await.unwrap();
        let mirror = client.get_proxy().await.unwrap();
        assert_eq!(mirror.echo_number(5).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_supplied_catalog_is_checked_without_fetch() {
        init_tracing();
        let identity = Identity::generate("client");
        let server = InMemoryServer::mirror(identity.certificate.public_certificate());

        let err = SignedRpcClient::<MirrorProxy>::create(
            Arc::clone(&server) as Arc<dyn SignedRequestTransport>,
            Arc::clone(&identity.certificate),
            Arc::clone(&identity.passphrase),
            &CancellationSignal::new(),
            Some(mirror_catalog_without("ping")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Incompatible { .. }));
        assert!(!err.is_remote());
        assert_eq!(server.catalog_calls(), 0);
    }
}
