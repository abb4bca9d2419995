//! End-to-end scenarios: client, proxy and pipeline against in-memory servers.

mod compatibility;
mod proxy;
