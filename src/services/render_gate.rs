//! Render Gate.
//!
//! Keeps full renders from overlapping. A request that arrives while a pass is
//! running is not run on its own; it marks the gate pending and the running pass
//! does exactly one trailing pass for all such requests.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct RenderGate {
    in_flight: AtomicBool,
    pending: AtomicBool,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate. Returns false, and records a pending request, if a pass is
    /// already running.
    pub fn try_enter(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            return true;
        }
        self.pending.store(true, Ordering::Release);
        false
    }

    /// Ends a pass. Returns true if the caller must run one more pass, in which
    /// case it still holds the gate.
    pub fn finish_pass(&self) -> bool {
        if self.pending.swap(false, Ordering::AcqRel) {
            return true;
        }
        self.in_flight.store(false, Ordering::Release);
        // A request may have landed between the swap and the release.
        if self.pending.load(Ordering::Acquire) && self.try_enter() {
            self.pending.store(false, Ordering::Release);
            return true;
        }
        false
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}
