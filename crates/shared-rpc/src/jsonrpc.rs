//! JSON-RPC 2.0 wire types.
//!
//! Requests carry positional params. Responses are decoded in two stages:
//! first as a raw JSON object, then the `result` member is deserialized into
//! the caller's expected return type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// The only protocol version we speak.
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod codes {
    // JSON-RPC 2.0 standard errors (-32700 to -32600)
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Server errors (-32000 to -32099)
    pub const SERVER_ERROR: i32 = -32000;
    pub const UNAUTHORIZED: i32 = -32010;
}

/// JSON-RPC request ID type
///
/// JSON-RPC 2.0 ids are a string, a number or null. Null ids mark
/// notifications and are never produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// String ID
    String(String),
    /// Numeric ID
    Number(i64),
}

impl From<Uuid> for JsonRpcId {
    fn from(id: Uuid) -> Self {
        JsonRpcId::String(id.to_string())
    }
}

impl fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonRpcId::String(s) => write!(f, "\"{}\"", s),
            JsonRpcId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A JSON-RPC request with positional params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Positional parameters.
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
    /// Request id, echoed back by the server.
    pub id: JsonRpcId,
}

impl JsonRpcRequest {
    /// Build a request.
    pub fn new(id: impl Into<JsonRpcId>, method: impl Into<String>, params: Vec<serde_json::Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// Error object of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// JSON-RPC error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Optional additional data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    /// Create a new error object.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach additional data.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Method not found
    pub fn method_not_found(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Invalid parameters
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, format!("Invalid params: {}", details.into()))
    }

    /// Internal error
    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, format!("Internal error: {}", details.into()))
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}

/// A JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Result on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Id of the request this answers.
    pub id: JsonRpcId,
}

impl JsonRpcResponse {
    /// Successful response.
    pub fn success(id: JsonRpcId, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Failed response.
    pub fn failure(id: JsonRpcId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Encode as UTF-8 JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Why a response could not be turned into a typed result.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a JSON object.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The response answers a different request.
    #[error("response id mismatch: expected {expected}, got {actual}")]
    IdMismatch {
        /// Id we sent
        expected: JsonRpcId,
        /// Id the server returned
        actual: JsonRpcId,
    },

    /// The remote method failed.
    #[error("remote error {0}")]
    Remote(JsonRpcError),

    /// `result` does not fit the expected return type.
    #[error("unexpected result type: {0}")]
    ResultType(String),
}

/// Encode a request as UTF-8 JSON bytes.
pub fn encode_request(request: &JsonRpcRequest) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(request)
}

/// Decode a response and map it onto the expected return type `R`.
///
/// A missing `result` member decodes as `null`, so methods returning `()`
/// accept servers that omit it.
pub fn decode_response<R: DeserializeOwned>(
    bytes: &[u8],
    expected_id: &JsonRpcId,
) -> Result<R, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(DecodeError::Malformed("response is not a JSON object".into()));
    }

    let response: JsonRpcResponse =
        serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    if response.jsonrpc != JSONRPC_VERSION {
        return Err(DecodeError::Malformed(format!(
            "unsupported jsonrpc version {:?}",
            response.jsonrpc
        )));
    }

    if &response.id != expected_id {
        return Err(DecodeError::IdMismatch {
            expected: expected_id.clone(),
            actual: response.id,
        });
    }

    if let Some(error) = response.error {
        return Err(DecodeError::Remote(error));
    }

    let result = response.result.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result).map_err(|e| DecodeError::ResultType(e.to_string()))
}
