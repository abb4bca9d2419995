//! # Client Errors
//!
//! One variant per failure class a caller can observe. Every public operation
//! returns these synchronously to its own caller; nothing is retried here
//! except timed-out catalog fetches during construction.

use crate::domain::compatibility::MethodMismatch;
use crate::domain::config::ConfigError;
use crate::domain::lifecycle::LifecycleState;
use crate::ports::outbound::TransportError;
use shared_crypto::CryptoError;
use shared_rpc::JsonRpcError;
use thiserror::Error;

/// Errors surfaced by the signed RPC client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The target interface does not match the server's method catalog.
    #[error("interface {interface} does not match the server method catalog ({} mismatches)", .mismatches.len())]
    Incompatible {
        /// Name of the target interface.
        interface: &'static str,
        /// Every method that failed to match.
        mismatches: Vec<MethodMismatch>,
    },

    /// The catalog fetch kept timing out until the retry policy gave up.
    #[error("method catalog fetch timed out {attempts} times")]
    MetadataFetchExhausted {
        /// Fetches made before giving up.
        attempts: u32,
    },

    /// The catalog fetch failed with something other than a timeout.
    #[error("method catalog fetch failed: {0}")]
    MetadataFetch(TransportError),

    /// Operation attempted while the object is not operational.
    #[error("{object} is not in a usable state ({state})")]
    Lifecycle {
        /// Configured object name.
        object: String,
        /// State the object was in.
        state: LifecycleState,
    },

    /// The call observed the cancellation signal.
    #[error("call cancelled")]
    Cancelled,

    /// The remote method itself reported a failure.
    #[error("remote method {method} failed: {error}")]
    Remote {
        /// Method that was called.
        method: String,
        /// Error object returned by the server.
        error: JsonRpcError,
    },

    /// Transport failure or a response that could not be decoded.
    #[error("invocation of {method} failed: {reason}")]
    Invocation {
        /// Method that was called.
        method: String,
        /// What went wrong.
        reason: String,
    },

    /// Signing the request envelope failed (e.g. wrong passphrase).
    #[error("request signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// An argument could not be encoded as JSON.
    #[error("failed to encode argument {index} of {method}: {reason}")]
    Encode {
        /// Method that was called.
        method: String,
        /// Zero-based argument position.
        index: usize,
        /// Serializer message.
        reason: String,
    },

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// True for errors caused by the cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// True for operations rejected by the lifecycle guard.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, ClientError::Lifecycle { .. })
    }

    /// True when the remote method itself reported a failure.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Remote { .. })
    }

    /// The remote error object, if the remote method failed.
    pub fn remote_error(&self) -> Option<&JsonRpcError> {
        match self {
            ClientError::Remote { error, .. } => Some(error),
            _ => None,
        }
    }

    pub(crate) fn invocation(method: &str, reason: impl ToString) -> Self {
        ClientError::Invocation {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
