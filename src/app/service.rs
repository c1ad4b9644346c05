//! Tap-to-toggle dispatcher.
//!
//! ```text
//!  sleep() ──▶ most_recent_events() ──▶ dispatch
//!                                         ├─ LaunchpadS1         → toggle LED2
//!                                         ├─ BoosterpackJoystick → toggle LED1
//!                                         └─ others              → logged only
//! ```

use log::{debug, info};

use crate::drivers::indicator::Indicator;
use crate::events::{EventKind, EventSet};
use crate::hal::InterruptHal;
use crate::power::WakeReason;
use crate::ports::Platform;

// ───────────────────────────────────────────────────────────────
// TapToggle
// ───────────────────────────────────────────────────────────────

/// Single consumer of the HAL's event register.
pub struct TapToggle<'a, P: Platform> {
    hal: &'a InterruptHal<P>,
    taps: [u32; EventKind::COUNT],
    wakes: u32,
}

impl<'a, P: Platform> TapToggle<'a, P> {
    pub fn new(hal: &'a InterruptHal<P>) -> Self {
        Self {
            hal,
            taps: [0; EventKind::COUNT],
            wakes: 0,
        }
    }

    /// Both LEDs on, as a power-up indication.
    pub fn start(&mut self) {
        self.hal.indicator_on(Indicator::Led1);
        self.hal.indicator_on(Indicator::Led2Red);
        info!("app: waiting for taps");
    }

    /// One main-loop iteration: sleep, drain, dispatch.
    pub fn step(&mut self) -> EventSet {
        let reason = self.hal.sleep();
        let events = self.hal.most_recent_events();
        self.wakes = self.wakes.wrapping_add(1);
        if events.is_empty() {
            debug!("app: wake #{} ({:?}) with no events", self.wakes, reason);
        } else if reason == WakeReason::AlreadyPending {
            debug!("app: {:?} were pending before sleep", events);
        }
        self.dispatch(events);
        events
    }

    pub fn dispatch(&mut self, events: EventSet) {
        for kind in events.iter() {
            self.taps[kind.index()] = self.taps[kind.index()].wrapping_add(1);
            match kind {
                EventKind::LaunchpadS1 => self.hal.indicator_toggle(Indicator::Led2Red),
                EventKind::BoosterpackJoystick => self.hal.indicator_toggle(Indicator::Led1),
                other => debug!("app: {} tapped, no action", other),
            }
        }
    }

    /// Taps of `kind` dispatched so far.
    pub fn taps(&self, kind: EventKind) -> u32 {
        self.taps[kind.index()]
    }

    pub fn wakes(&self) -> u32 {
        self.wakes
    }
}
