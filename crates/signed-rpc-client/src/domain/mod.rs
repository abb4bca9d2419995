//! # Domain Layer
//!
//! Pure client logic: envelopes, compatibility rules, the lifecycle state
//! machine and the cancellation signal. Nothing here talks to a transport.

pub mod cancellation;
pub mod compatibility;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod lifecycle;
