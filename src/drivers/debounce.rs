//! Per-source debounce gate.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  A single press produces a
//! burst of falling edges while the contacts settle; each edge raises the
//! port interrupt.  The gate lets the first edge through and rejects every
//! edge that follows within the cooldown window.
//!
//! ## State machine
//!
//! | State    | On `accept(now)`                                          |
//! |----------|-----------------------------------------------------------|
//! | Unarmed  | build an already-expired timer, go to Armed, then as Armed |
//! | Armed    | expired → restart timer, accept; otherwise reject          |
//!
//! Only an accepted edge restarts the cooldown.  Rejected edges neither
//! restart nor extend it.

use super::sw_timer::SoftwareTimer;

/// Cooldown used by the Launchpad buttons.
pub const LAUNCHPAD_COOLDOWN_MS: u32 = 300;
/// Cooldown used by the Boosterpack inputs.
pub const BOOSTERPACK_COOLDOWN_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Unarmed,
    Armed(SoftwareTimer),
}

/// Decides whether a raw edge becomes a logical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceGate {
    cooldown_ms: u32,
    state: GateState,
}

impl DebounceGate {
    pub const fn new(cooldown_ms: u32) -> Self {
        Self {
            cooldown_ms,
            state: GateState::Unarmed,
        }
    }

    /// Run one raw edge observed at `now_ms` through the gate.
    pub fn accept(&mut self, now_ms: u32) -> bool {
        if self.state == GateState::Unarmed {
            self.state = GateState::Armed(SoftwareTimer::new(self.cooldown_ms, now_ms));
        }

        let GateState::Armed(timer) = &mut self.state else {
            return false;
        };

        if !timer.is_expired(now_ms) {
            return false;
        }
        timer.start(now_ms);
        true
    }

    pub const fn cooldown_ms(&self) -> u32 {
        self.cooldown_ms
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, GateState::Armed(_))
    }

    /// Back to Unarmed; the next edge is accepted unconditionally.
    pub fn reset(&mut self) {
        self.state = GateState::Unarmed;
    }
}
