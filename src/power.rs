//! Sleep/wake power controller.
//!
//! The main loop calls [`PowerController::sleep`] once per iteration.  The
//! core stays in its low-power wait until any enabled port interrupt
//! fires, then execution continues after the call and the caller drains
//! the event register.
//!
//! ## Lost-wake race
//!
//! An edge can be recorded after the main loop's last drain but before
//! the core actually waits.  The register is checked with global delivery
//! masked and the wait is skipped when it is non-empty; if the edge lands
//! between that check and the wait instruction, the pending interrupt makes
//! the wait return at once.  Either way the event is seen on this wake.
//!
//! The register is not cleared here: anything recorded while the main
//! loop was dispatching is still owed to the next drain.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::events::EventRegister;
use crate::ports::Platform;

/// Why [`PowerController::sleep`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// Events were already waiting; the core never entered the wait state.
    AlreadyPending,
    /// The core waited and an interrupt resumed it.
    Interrupt,
}

#[derive(Debug, Default)]
pub struct PowerController {
    sleeps: AtomicU32,
    immediate: AtomicU32,
}

impl PowerController {
    pub const fn new() -> Self {
        Self {
            sleeps: AtomicU32::new(0),
            immediate: AtomicU32::new(0),
        }
    }

    /// Enter the low-power wait unless events are already pending.
    pub fn sleep<P: Platform>(&self, platform: &P, events: &EventRegister) -> WakeReason {
        let reason = platform.interrupt_free(|| {
            if events.is_empty() {
                platform.wait_for_interrupt();
                WakeReason::Interrupt
            } else {
                WakeReason::AlreadyPending
            }
        });

        self.sleeps.fetch_add(1, Ordering::Relaxed);
        if reason == WakeReason::AlreadyPending {
            self.immediate.fetch_add(1, Ordering::Relaxed);
        }
        reason
    }

    /// Number of `sleep` calls so far.
    pub fn sleep_cycles(&self) -> u32 {
        self.sleeps.load(Ordering::Relaxed)
    }

    /// Number of `sleep` calls that returned without waiting.
    pub fn immediate_wakes(&self) -> u32 {
        self.immediate.load(Ordering::Relaxed)
    }
}
