//! Interrupt-driven event register.
//!
//! Events are produced by the GPIO port handlers after debounce and
//! consumed by the main loop after every wake.
//!
//! ```text
//! ┌─────────────┐  record()  ┌──────────────────┐  drain()  ┌──────────────┐
//! │ Port ISR    │───────────▶│  EventRegister   │──────────▶│  Main Loop   │
//! │ (debounced) │            │  (atomic bitset) │           │  (consumer)  │
//! └─────────────┘            └──────────────────┘           └──────────────┘
//! ```
//!
//! This is aggregation, not queueing: several presses of the same button
//! between two drains collapse into one reported event, while presses of
//! different buttons are all reported by the same drain.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Logical input that produced an event.  One per interrupt source.
///
/// The discriminant is the bit position inside the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    /// Launchpad push-button S1.
    LaunchpadS1 = 0,
    /// Launchpad push-button S2.
    LaunchpadS2 = 1,
    /// Boosterpack push-button S1.
    BoosterpackS1 = 2,
    /// Boosterpack push-button S2.
    BoosterpackS2 = 3,
    /// Boosterpack joystick select (press on the stick).
    BoosterpackJoystick = 4,
}

impl EventKind {
    /// Every kind, in bit order.
    pub const ALL: [EventKind; 5] = [
        Self::LaunchpadS1,
        Self::LaunchpadS2,
        Self::BoosterpackS1,
        Self::BoosterpackS2,
        Self::BoosterpackJoystick,
    ];

    /// Number of distinct kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Register bit for this kind.
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LaunchpadS1 => "launchpad-s1",
            Self::LaunchpadS2 => "launchpad-s2",
            Self::BoosterpackS1 => "boosterpack-s1",
            Self::BoosterpackS2 => "boosterpack-s2",
            Self::BoosterpackJoystick => "boosterpack-js",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bits of the register that map to a defined [`EventKind`].
const VALID_BITS: u8 = (1 << EventKind::COUNT) - 1;

// ── EventSet ──────────────────────────────────────────────────

/// A set of [`EventKind`]s.  Bitmask underneath; typed on the surface.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct EventSet(u8);

impl EventSet {
    pub const EMPTY: Self = Self(0);

    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Build a set from raw register bits.  Undefined bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & VALID_BITS)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with(self, kind: EventKind) -> Self {
        Self(self.0 | kind.mask())
    }

    pub fn insert(&mut self, kind: EventKind) {
        self.0 |= kind.mask();
    }

    pub fn remove(&mut self, kind: EventKind) {
        self.0 &= !kind.mask();
    }

    pub const fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.mask() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Kinds in the set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl fmt::Debug for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<EventKind> for EventSet {
    fn from_iter<I: IntoIterator<Item = EventKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl From<EventKind> for EventSet {
    fn from(kind: EventKind) -> Self {
        Self::EMPTY.with(kind)
    }
}

// ── EventRegister ─────────────────────────────────────────────
//
// Interrupt context only ever sets bits (`fetch_or`); the main loop only
// ever clears them (`swap` / `fetch_and` / `store`).  Every read-and-clear
// is a single atomic RMW, so a bit set between the "read" and the "clear"
// cannot be dropped.

/// Process-wide record of which events occurred since the last clear.
#[derive(Debug, Default)]
pub struct EventRegister {
    flags: AtomicU8,
}

impl EventRegister {
    pub const fn new() -> Self {
        Self {
            flags: AtomicU8::new(0),
        }
    }

    /// Mark `kind` as occurred.  Interrupt context; idempotent.
    pub fn record(&self, kind: EventKind) {
        self.flags.fetch_or(kind.mask(), Ordering::Release);
    }

    /// Return every recorded kind and reset the register, atomically.
    pub fn drain(&self) -> EventSet {
        EventSet::from_bits(self.flags.swap(0, Ordering::AcqRel))
    }

    /// Peek at a single kind without consuming it.
    pub fn is_set(&self, kind: EventKind) -> bool {
        self.flags.load(Ordering::Acquire) & kind.mask() != 0
    }

    /// Consume a single kind, leaving the others pending.
    pub fn take(&self, kind: EventKind) -> bool {
        self.flags.fetch_and(!kind.mask(), Ordering::AcqRel) & kind.mask() != 0
    }

    /// Reset every flag.  Used with the [`is_set`](Self::is_set) style of
    /// consumption, and by HAL initialisation.
    pub fn clear_all(&self) {
        self.flags.store(0, Ordering::Release);
    }

    /// Non-destructive snapshot.
    pub fn pending(&self) -> EventSet {
        EventSet::from_bits(self.flags.load(Ordering::Acquire))
    }

    pub fn is_empty(&self) -> bool {
        self.flags.load(Ordering::Acquire) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_are_distinct() {
        let combined = EventKind::ALL.iter().fold(0u8, |acc, k| {
            assert_eq!(acc & k.mask(), 0, "{k} overlaps another kind");
            acc | k.mask()
        });
        assert_eq!(combined, VALID_BITS);
    }

    #[test]
    fn repeated_record_collapses() {
        let reg = EventRegister::new();
        reg.record(EventKind::LaunchpadS1);
        reg.record(EventKind::LaunchpadS1);
        reg.record(EventKind::BoosterpackJoystick);

        let drained = reg.drain();
        assert_eq!(drained.len(), 2);
        assert!(drained.contains(EventKind::LaunchpadS1));
        assert!(drained.contains(EventKind::BoosterpackJoystick));
    }

    #[test]
    fn drain_is_destructive() {
        let reg = EventRegister::new();
        reg.record(EventKind::LaunchpadS2);
        assert!(!reg.drain().is_empty());
        assert!(reg.drain().is_empty());
    }

    #[test]
    fn take_leaves_other_kinds_pending() {
        let reg = EventRegister::new();
        reg.record(EventKind::LaunchpadS1);
        reg.record(EventKind::BoosterpackS2);

        assert!(reg.take(EventKind::LaunchpadS1));
        assert!(!reg.take(EventKind::LaunchpadS1));
        assert!(reg.is_set(EventKind::BoosterpackS2));
        assert_eq!(reg.drain(), EventSet::from(EventKind::BoosterpackS2));
    }

    #[test]
    fn is_set_does_not_clear() {
        let reg = EventRegister::new();
        reg.record(EventKind::BoosterpackS1);
        assert!(reg.is_set(EventKind::BoosterpackS1));
        assert!(reg.is_set(EventKind::BoosterpackS1));
        reg.clear_all();
        assert!(reg.is_empty());
    }

    #[test]
    fn from_bits_drops_undefined_bits() {
        let set = EventSet::from_bits(0xFF);
        assert_eq!(set.len(), EventKind::COUNT);
    }

    #[test]
    fn set_iterates_in_bit_order() {
        let set: EventSet = [EventKind::BoosterpackJoystick, EventKind::LaunchpadS1]
            .into_iter()
            .collect();
        let kinds: Vec<_> = set.iter().collect();
        assert_eq!(kinds, vec![EventKind::LaunchpadS1, EventKind::BoosterpackJoystick]);
    }
}
