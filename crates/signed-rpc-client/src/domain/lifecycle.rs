//! # Lifecycle Guard
//!
//! `Uninitialized -> Operational -> Disposing -> Disposed`, forward only.
//!
//! Every public operation runs under a [`CallPermit`] obtained from
//! [`LifecycleGuard::enter`]. Entry is refused outside `Operational`. Disposal
//! flips the state first, so no new permit can be issued, then waits for the
//! permits already handed out to drop.

use crate::domain::errors::ClientError;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use tokio::sync::Notify;
use tracing::{debug, info};

/// Lifecycle state of a client instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Constructed, catalog not yet validated.
    Uninitialized,
    /// Accepting calls.
    Operational,
    /// Disposal started; waiting for in-flight calls.
    Disposing,
    /// Terminal.
    Disposed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Operational => "operational",
            LifecycleState::Disposing => "disposing",
            LifecycleState::Disposed => "disposed",
        })
    }
}

struct Inner {
    state: LifecycleState,
    in_flight: usize,
}

/// Gates operations on the lifecycle state and tracks in-flight permits.
pub struct LifecycleGuard {
    object: String,
    inner: Mutex<Inner>,
    drained: Notify,
}

impl LifecycleGuard {
    /// New guard in `Uninitialized`.
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            inner: Mutex::new(Inner {
                state: LifecycleState::Uninitialized,
                in_flight: 0,
            }),
            drained: Notify::new(),
        }
    }

    /// Name used in errors and logs.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.inner.lock().state
    }

    /// Number of operations currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight
    }

    /// `Uninitialized -> Operational`. Any other starting state is an error.
    pub fn mark_operational(&self) -> Result<(), ClientError> {
        let mut inner = self.inner.lock();
        if inner.state != LifecycleState::Uninitialized {
            return Err(self.unusable(inner.state));
        }
        self.transition(&mut inner, LifecycleState::Operational);
        Ok(())
    }

    /// Admit one operation. The permit must be held until the operation ends.
    pub fn enter(&self) -> Result<CallPermit<'_>, ClientError> {
        let mut inner = self.inner.lock();
        if inner.state != LifecycleState::Operational {
            return Err(self.unusable(inner.state));
        }
        inner.in_flight += 1;
        Ok(CallPermit { guard: self })
    }

    /// Move to `Disposing`. Returns `true` only for the caller that performed
    /// the transition.
    pub fn begin_dispose(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            LifecycleState::Uninitialized | LifecycleState::Operational => {
                self.transition(&mut inner, LifecycleState::Disposing);
                true
            }
            LifecycleState::Disposing | LifecycleState::Disposed => false,
        }
    }

    /// Wait until no permit is outstanding.
    ///
    /// Any number of callers may wait, and a caller that gives up does not
    /// affect the others. Only meaningful once disposal has begun.
    pub async fn drained(&self) {
        loop {
            let drained = self.drained.notified();
            tokio::pin!(drained);
            drained.as_mut().enable();

            let remaining = self.inner.lock().in_flight;
            if remaining == 0 {
                return;
            }
            debug!(object = %self.object, remaining, "Waiting for in-flight operations");
            drained.await;
        }
    }

    /// `Disposing -> Disposed` once drained. Returns `true` only for the
    /// caller that performed the transition.
    pub fn mark_disposed(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != LifecycleState::Disposing || inner.in_flight != 0 {
            return false;
        }
        self.transition(&mut inner, LifecycleState::Disposed);
        true
    }

    fn transition(&self, inner: &mut Inner, next: LifecycleState) {
        info!(object = %self.object, from = %inner.state, to = %next, "Lifecycle transition");
        inner.state = next;
    }

    fn release(&self) {
        let mut inner = self.inner.lock();
        inner.in_flight -= 1;
        if inner.in_flight == 0 && inner.state == LifecycleState::Disposing {
            self.drained.notify_waiters();
        }
    }

    fn unusable(&self, state: LifecycleState) -> ClientError {
        ClientError::Lifecycle {
            object: self.object.clone(),
            state,
        }
    }
}

impl fmt::Debug for LifecycleGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("LifecycleGuard")
            .field("object", &self.object)
            .field("state", &inner.state)
            .field("in_flight", &inner.in_flight)
            .finish()
    }
}

/// Proof that an operation was admitted. Dropping it releases the slot.
#[must_use = "the operation is only tracked while the permit is held"]
pub struct CallPermit<'a> {
    guard: &'a LifecycleGuard,
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        self.guard.release();
    }
}
