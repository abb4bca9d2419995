//! # Ports
//!
//! - `inbound`: what application code implements or calls (`RpcInterface`, `MethodCall`)
//! - `outbound`: what the caller supplies to reach the server (`SignedRequestTransport`)

pub mod inbound;
pub mod outbound;
