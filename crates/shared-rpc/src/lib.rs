//! # Shared RPC
//!
//! The RPC-encoding collaborator used by signed clients and the servers they
//! talk to.
//!
//! - [`jsonrpc`]: JSON-RPC 2.0 request/response/error types, request encoding
//!   and typed response decoding.
//! - [`catalog`]: method descriptors a server publishes and the [`TypeShape`]
//!   mapping from Rust types to language-neutral shape names.

pub mod catalog;
pub mod jsonrpc;

pub use catalog::{MethodDescriptor, ParamDescriptor, TypeShape};
pub use jsonrpc::{
    codes, decode_response, encode_request, DecodeError, JsonRpcError, JsonRpcId, JsonRpcRequest,
    JsonRpcResponse, JSONRPC_VERSION,
};
