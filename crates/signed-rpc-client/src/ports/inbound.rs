//! # Inbound Ports (Driving Ports / API)
//!
//! A target interface is any type implementing [`RpcInterface`]. The
//! [`rpc_interface!`](crate::rpc_interface) macro writes that implementation
//! for you; hand-written adapters work the same way.

use crate::domain::errors::ClientError;
use crate::pipeline::Invoker;
use serde::Serialize;
use shared_rpc::MethodDescriptor;

/// A typed interface whose calls are forwarded to a remote server.
pub trait RpcInterface: Send + Sync + Sized + 'static {
    /// Interface name used in errors and logs.
    const NAME: &'static str;

    /// Descriptors of every method the interface calls, checked against the
    /// server catalog at construction.
    fn method_descriptors() -> Vec<MethodDescriptor>;

    /// Build the call-through proxy around the pipeline handle.
    fn from_invoker(invoker: Invoker) -> Self;
}

/// One intercepted call: method identity plus positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    method: String,
    params: Vec<serde_json::Value>,
}

impl MethodCall {
    /// Start a call to `method` with no arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
        }
    }

    /// Append the next positional argument.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ClientError> {
        let encoded = serde_json::to_value(value).map_err(|e| ClientError::Encode {
            method: self.method.clone(),
            index: self.params.len(),
            reason: e.to_string(),
        })?;
        self.params.push(encoded);
        Ok(self)
    }

    /// Method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Encoded arguments.
    pub fn params(&self) -> &[serde_json::Value] {
        &self.params
    }

    pub(crate) fn into_parts(self) -> (String, Vec<serde_json::Value>) {
        (self.method, self.params)
    }
}
