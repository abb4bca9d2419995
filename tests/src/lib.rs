//! # Signed-RPC Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support/          # In-memory servers, fixtures, interfaces
//! └── integration/      # End-to-end client scenarios
//!     ├── round_trip.rs
//!     ├── compatibility.rs
//!     ├── proxy.rs
//!     ├── lifecycle.rs
//!     └── cancellation.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p signed-rpc-tests
//!
//! # By category
//! cargo test -p signed-rpc-tests integration::cancellation::
//!
//! # With client logs
//! RUST_LOG=signed_rpc_client=debug cargo test -p signed-rpc-tests -- --nocapture
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod support;
