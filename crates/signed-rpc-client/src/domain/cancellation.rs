//! # Cancellation Signal
//!
//! One signal per client instance, created with it and fired exactly once
//! when disposal starts. Every suspending step of an in-flight call races its
//! future against [`CancellationSignal::run_until_cancelled`].

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Marker returned when the signal fired before the raced future finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Shared, non-resettable cancellation signal.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    state: Arc<watch::Sender<bool>>,
}

impl CancellationSignal {
    /// Create a signal that has not fired.
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Fire the signal. Returns `true` only for the call that fired it.
    pub fn cancel(&self) -> bool {
        !self.state.send_replace(true)
    }

    /// Whether the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once the signal has fired.
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only returns once fired.
        let _ = rx.wait_for(|fired| *fired).await;
    }

    /// Drive `future` unless the signal fires first.
    ///
    /// An already-fired signal wins without polling `future` at all; a late
    /// result from `future` is dropped.
    pub async fn run_until_cancelled<F: Future>(&self, future: F) -> Result<F::Output, Cancelled> {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Cancelled),
            output = future => Ok(output),
        }
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}
