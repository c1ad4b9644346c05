//! Host simulation platform.
//!
//! In-memory GPIO ports with a manually advanced clock.  Tests (and any
//! host-side tooling) inject edges with [`SimPlatform::press`], call the
//! HAL's port handler themselves to play the role of the interrupt
//! controller, and inspect the call journal to check bring-up order.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{HalError, Result};
use crate::interrupts::{Edge, Line, Port, Pull};
use crate::ports::{Clock, Platform};

/// One recorded platform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCall {
    MaskInterrupts,
    UnmaskInterrupts,
    ConfigureInput(Line, Pull),
    SetEdge(Line, Edge),
    EnableLine(Line),
    RoutePort(Port),
    UnmaskPort(Port),
    ClearPending(Port, u32),
    ConfigureOutput(Line, bool),
    SetSleepOnExit(bool),
    EnableDelivery,
    Wait,
}

#[derive(Debug, Default)]
pub struct SimPlatform {
    now_ms: Cell<u32>,
    masked: Cell<bool>,
    pending: RefCell<BTreeMap<Port, u32>>,
    enabled: RefCell<BTreeSet<Line>>,
    outputs: RefCell<BTreeMap<Line, bool>>,
    journal: RefCell<Vec<SimCall>>,
    press_during_wait: RefCell<Vec<Line>>,
    press_when_routed: RefCell<Vec<Line>>,
    fail_line: Cell<Option<Line>>,
    fail_delivery: Cell<bool>,
    delivering: Cell<bool>,
    waits: Cell<u32>,
}

impl SimPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Clock control ─────────────────────────────────────────

    pub fn set_time(&self, now_ms: u32) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now_ms.set(self.now_ms.get().wrapping_add(ms));
    }

    // ── Stimulus ──────────────────────────────────────────────

    /// Latch an edge on `line`.  Lines without an enabled interrupt do
    /// not latch, as on the real port.
    pub fn press(&self, line: Line) {
        if self.enabled.borrow().contains(&line) {
            self.latch(line);
        }
    }

    /// Latch an edge on `line` regardless of its configuration.
    pub fn glitch(&self, line: Line) {
        self.latch(line);
    }

    /// Deliver an edge on `line` during the next low-power wait.
    pub fn press_during_next_wait(&self, line: Line) {
        self.press_during_wait.borrow_mut().push(line);
    }

    /// Deliver an edge on `line` right after its port is routed, while
    /// `init()` is still running.
    pub fn press_when_routed(&self, line: Line) {
        self.press_when_routed.borrow_mut().push(line);
    }

    /// Make configuration of `line` fail with a platform error.
    pub fn fail_on(&self, line: Line) {
        self.fail_line.set(Some(line));
    }

    /// Make `enable_delivery` fail with a platform error.
    pub fn fail_delivery(&self) {
        self.fail_delivery.set(true);
    }

    fn latch(&self, line: Line) {
        *self.pending.borrow_mut().entry(line.port).or_default() |= line.mask();
    }

    // ── Observation ───────────────────────────────────────────

    pub fn pending(&self, port: Port) -> u32 {
        self.pending.borrow().get(&port).copied().unwrap_or(0)
    }

    /// Current level of an output line; `None` if never configured.
    pub fn output(&self, line: Line) -> Option<bool> {
        self.outputs.borrow().get(&line).copied()
    }

    pub fn is_masked(&self) -> bool {
        self.masked.get()
    }

    /// `true` once `enable_delivery` has succeeded.
    pub fn is_delivering(&self) -> bool {
        self.delivering.get()
    }

    pub fn journal(&self) -> Vec<SimCall> {
        self.journal.borrow().clone()
    }

    pub fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }

    /// Number of times the core actually entered the wait state.
    pub fn waits(&self) -> u32 {
        self.waits.get()
    }

    fn log(&self, call: SimCall) {
        self.journal.borrow_mut().push(call);
    }

    fn check(&self, op: &'static str, line: Line) -> Result<()> {
        if self.fail_line.get() == Some(line) {
            return Err(HalError::Platform { op, code: -1 });
        }
        Ok(())
    }
}

impl Clock for SimPlatform {
    fn now_ms(&self) -> u32 {
        self.now_ms.get()
    }
}

impl Platform for SimPlatform {
    fn interrupt_free<R>(&self, f: impl FnOnce() -> R) -> R {
        let was_masked = self.masked.replace(true);
        if !was_masked {
            self.log(SimCall::MaskInterrupts);
        }
        let r = f();
        if !was_masked {
            self.masked.set(false);
            self.log(SimCall::UnmaskInterrupts);
        }
        r
    }

    fn configure_input(&self, line: Line, pull: Pull) -> Result<()> {
        self.check("configure_input", line)?;
        self.log(SimCall::ConfigureInput(line, pull));
        Ok(())
    }

    fn set_edge(&self, line: Line, edge: Edge) -> Result<()> {
        self.log(SimCall::SetEdge(line, edge));
        Ok(())
    }

    fn enable_line_interrupt(&self, line: Line) -> Result<()> {
        self.enabled.borrow_mut().insert(line);
        self.log(SimCall::EnableLine(line));
        Ok(())
    }

    fn route_port(&self, port: Port) -> Result<()> {
        self.log(SimCall::RoutePort(port));
        let lines: Vec<Line> = self.press_when_routed.borrow_mut().drain(..).collect();
        for line in lines {
            if line.port == port {
                self.press(line);
            } else {
                self.press_when_routed.borrow_mut().push(line);
            }
        }
        Ok(())
    }

    fn unmask_port(&self, port: Port) -> Result<()> {
        self.log(SimCall::UnmaskPort(port));
        Ok(())
    }

    fn pending_lines(&self, port: Port) -> u32 {
        self.pending(port)
    }

    fn clear_pending(&self, port: Port, mask: u32) {
        if let Some(bits) = self.pending.borrow_mut().get_mut(&port) {
            *bits &= !mask;
        }
        self.log(SimCall::ClearPending(port, mask));
    }

    fn configure_output(&self, line: Line, high: bool) -> Result<()> {
        self.check("configure_output", line)?;
        self.outputs.borrow_mut().insert(line, high);
        self.log(SimCall::ConfigureOutput(line, high));
        Ok(())
    }

    fn write_line(&self, line: Line, high: bool) {
        if let Some(level) = self.outputs.borrow_mut().get_mut(&line) {
            *level = high;
        }
    }

    fn toggle_line(&self, line: Line) {
        if let Some(level) = self.outputs.borrow_mut().get_mut(&line) {
            *level = !*level;
        }
    }

    fn enable_delivery(&self) -> Result<()> {
        if self.fail_delivery.get() {
            return Err(HalError::Platform {
                op: "enable_delivery",
                code: -1,
            });
        }
        self.delivering.set(true);
        self.log(SimCall::EnableDelivery);
        Ok(())
    }

    fn set_sleep_on_exit(&self, enabled: bool) {
        self.log(SimCall::SetSleepOnExit(enabled));
    }

    fn wait_for_interrupt(&self) {
        // Already pending: the wait instruction falls straight through.
        if self.pending.borrow().values().any(|bits| *bits != 0) {
            return;
        }
        self.waits.set(self.waits.get() + 1);
        self.log(SimCall::Wait);

        let lines: Vec<Line> = self.press_during_wait.borrow_mut().drain(..).collect();
        for line in lines {
            self.press(line);
        }
    }
}
