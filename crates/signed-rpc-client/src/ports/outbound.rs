//! # Outbound Ports (Driven Ports / SPI)
//!
//! The transport function set a caller wires in. It may be a network
//! connection, a message queue or an in-process server; the client only
//! needs these three calls.

use crate::domain::envelope::SignedEnvelope;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_rpc::MethodDescriptor;
use thiserror::Error;

/// Error from transport operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The operation timed out. Catalog fetches retry on this.
    #[error("transport operation timed out")]
    Timeout,

    /// The server or channel cannot be reached.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// Any other failure.
    #[error("transport failure: {0}")]
    Failed(String),
}

impl TransportError {
    /// True for [`TransportError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

/// Functions a server exposes to one-side-signed clients.
#[async_trait]
pub trait SignedRequestTransport: Send + Sync {
    /// Deliver a signed request packet and return the raw response bytes.
    async fn process_signed_request_packet(
        &self,
        packet: SignedEnvelope,
    ) -> Result<Vec<u8>, TransportError>;

    /// Fetch the server's method catalog.
    async fn get_method_infos(&self) -> Result<Vec<MethodDescriptor>, TransportError>;

    /// Current time according to the server.
    async fn get_now_time(&self) -> Result<DateTime<Utc>, TransportError>;
}
