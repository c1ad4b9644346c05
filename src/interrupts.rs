//! Interrupt sources and per-port dispatch.
//!
//! The interrupt controller delivers one callback per port; all pins of
//! that port share it.  [`SourceTable::service`] demultiplexes the port's
//! pending-status word, runs each pending line through its debounce gate
//! and records accepted presses in the [`EventRegister`].
//!
//! Runs in interrupt context: no logging, no allocation, no blocking.

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::{MAX_SOURCES, SourceConfig};
use crate::drivers::debounce::DebounceGate;
use crate::error::{ConfigError, Result};
use crate::events::{EventKind, EventRegister, EventSet};
use crate::pins;

/// Pins per port; one bit each in the pending-status word.
pub const PINS_PER_PORT: u8 = 32;

// ── Line identity ─────────────────────────────────────────────

/// A GPIO port (interrupt group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(pub u8);

/// One physical pin: port plus pin index within the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Line {
    pub port: Port,
    pub pin: u8,
}

impl Line {
    pub const fn new(port: u8, pin: u8) -> Self {
        Self {
            port: Port(port),
            pin,
        }
    }

    /// `true` if the line exists on the board's GPIO matrix.
    pub const fn is_valid(self) -> bool {
        pins::exists(self)
    }

    /// Bit for this line in its port's status word.
    pub const fn mask(self) -> u32 {
        1 << self.pin
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}.{}", self.port.0, self.pin)
    }
}

/// Edge that raises the interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// High-to-low: contact closes to ground.
    #[default]
    Falling,
    Rising,
}

/// Input bias resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pull {
    None,
    #[default]
    Up,
    Down,
}

// ── InterruptSource ───────────────────────────────────────────

/// A configured input line, its debounce gate and the kind it reports.
pub struct InterruptSource {
    config: SourceConfig,
    gate: Mutex<CriticalSectionRawMutex, RefCell<DebounceGate>>,
}

impl InterruptSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            gate: Mutex::new(RefCell::new(DebounceGate::new(config.cooldown_ms))),
            config,
        }
    }

    pub fn line(&self) -> Line {
        self.config.line
    }

    pub fn kind(&self) -> EventKind {
        self.config.kind
    }

    pub fn edge(&self) -> Edge {
        self.config.edge
    }

    pub fn pull(&self) -> Pull {
        self.config.pull
    }

    pub fn cooldown_ms(&self) -> u32 {
        self.config.cooldown_ms
    }

    /// Debounce one raw edge observed at `now_ms`.
    pub fn accept(&self, now_ms: u32) -> bool {
        self.gate.lock(|gate| gate.borrow_mut().accept(now_ms))
    }

    pub fn is_armed(&self) -> bool {
        self.gate.lock(|gate| gate.borrow().is_armed())
    }

    fn reset(&self) {
        self.gate.lock(|gate| gate.borrow_mut().reset());
    }
}

impl fmt::Debug for InterruptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptSource")
            .field("config", &self.config)
            .field("armed", &self.is_armed())
            .finish()
    }
}

// ── Service report ────────────────────────────────────────────

/// Outcome of servicing one port interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceReport {
    /// Kinds recorded by this call.
    pub accepted: EventSet,
    /// Pending lines whose edge fell inside a debounce window.
    pub rejected: u8,
    /// Pending lines with no registered source, per port mask.
    pub stray: u32,
}

impl ServiceReport {
    pub fn merge(self, other: Self) -> Self {
        Self {
            accepted: self.accepted.union(other.accepted),
            rejected: self.rejected.saturating_add(other.rejected),
            stray: self.stray | other.stray,
        }
    }
}

// ── SourceTable ───────────────────────────────────────────────

/// Fixed-capacity table of every configured source.
#[derive(Debug)]
pub struct SourceTable {
    sources: Vec<InterruptSource, MAX_SOURCES>,
}

impl SourceTable {
    /// Build the table.  `configs` is expected to be validated already;
    /// only the capacity is rechecked here.
    pub fn from_configs(configs: &[SourceConfig]) -> Result<Self> {
        let mut sources = Vec::new();
        for config in configs {
            sources
                .push(InterruptSource::new(config.clone()))
                .map_err(|_| ConfigError::TooMany)?;
        }
        Ok(Self { sources })
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterruptSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn find(&self, kind: EventKind) -> Option<&InterruptSource> {
        self.sources.iter().find(|s| s.kind() == kind)
    }

    /// Distinct ports with at least one source, in first-seen order.
    pub fn ports(&self) -> Vec<Port, MAX_SOURCES> {
        let mut ports: Vec<Port, MAX_SOURCES> = Vec::new();
        for source in &self.sources {
            let port = source.line().port;
            if !ports.contains(&port) {
                // Cannot overflow: at most one port per source.
                let _ = ports.push(port);
            }
        }
        ports
    }

    /// Every gate back to Unarmed.
    pub fn reset_gates(&self) {
        for source in &self.sources {
            source.reset();
        }
    }

    /// Demultiplex `pending` for `port` and record accepted presses.
    pub fn service(
        &self,
        port: Port,
        pending: u32,
        now_ms: u32,
        events: &EventRegister,
    ) -> ServiceReport {
        let mut report = ServiceReport::default();
        let mut handled = 0u32;

        for source in self.sources.iter().filter(|s| s.line().port == port) {
            let mask = source.line().mask();
            if pending & mask == 0 {
                continue;
            }
            handled |= mask;

            if source.accept(now_ms) {
                events.record(source.kind());
                report.accepted.insert(source.kind());
            } else {
                report.rejected = report.rejected.saturating_add(1);
            }
        }

        report.stray = pending & !handled;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(kind: EventKind, port: u8, pin: u8, cooldown_ms: u32) -> SourceConfig {
        SourceConfig {
            kind,
            line: Line::new(port, pin),
            edge: Edge::Falling,
            pull: Pull::Up,
            cooldown_ms,
        }
    }

    #[test]
    fn service_demultiplexes_shared_port() {
        let table = SourceTable::from_configs(&[
            source(EventKind::LaunchpadS1, 1, 1, 300),
            source(EventKind::LaunchpadS2, 1, 4, 300),
        ])
        .unwrap();
        let events = EventRegister::new();

        let report = table.service(Port(1), 1 << 4, 0, &events);
        assert_eq!(report.accepted, EventSet::from(EventKind::LaunchpadS2));
        assert!(!events.is_set(EventKind::LaunchpadS1));
        assert!(events.is_set(EventKind::LaunchpadS2));
    }

    #[test]
    fn other_port_lines_are_ignored() {
        let table =
            SourceTable::from_configs(&[source(EventKind::LaunchpadS1, 1, 1, 300)]).unwrap();
        let events = EventRegister::new();

        let report = table.service(Port(2), 1 << 1, 0, &events);
        assert!(report.accepted.is_empty());
        assert_eq!(report.stray, 1 << 1);
        assert!(events.is_empty());
    }

    #[test]
    fn bounce_counts_as_rejected() {
        let table =
            SourceTable::from_configs(&[source(EventKind::BoosterpackJoystick, 4, 1, 50)])
                .unwrap();
        let events = EventRegister::new();

        assert_eq!(table.service(Port(4), 1 << 1, 0, &events).rejected, 0);
        let report = table.service(Port(4), 1 << 1, 10, &events);
        assert_eq!(report.rejected, 1);
        assert!(report.accepted.is_empty());
    }

    #[test]
    fn ports_are_deduplicated() {
        let table = SourceTable::from_configs(&[
            source(EventKind::LaunchpadS1, 1, 1, 300),
            source(EventKind::BoosterpackS1, 5, 1, 50),
            source(EventKind::LaunchpadS2, 1, 4, 300),
        ])
        .unwrap();
        assert_eq!(table.ports().as_slice(), &[Port(1), Port(5)]);
    }

    #[test]
    fn line_display() {
        assert_eq!(Line::new(1, 4).to_string(), "P1.4");
        assert!(!Line::new(0, 32).is_valid());
        assert!(!Line::new(2, 0).is_valid());
    }
}
