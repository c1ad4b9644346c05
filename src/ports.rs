//! Port traits: the boundary between the interrupt HAL and a concrete chip.
//!
//! ```text
//!   InterruptHal ──▶ Platform trait ──▶ Esp32Platform / SimPlatform
//! ```
//!
//! The HAL consumes these through generics, so debounce and event logic
//! never touch a register layout directly.  Every method takes `&self`:
//! the port handler reaches the platform from interrupt context through a
//! shared reference, the same way it reaches the memory-mapped registers.

use crate::error::Result;
use crate::interrupts::{Edge, Line, Port, Pull};

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Free-running millisecond counter.
pub trait Clock {
    /// Milliseconds since an arbitrary origin.  Wraps at `u32::MAX`.
    /// Must be callable from interrupt context.
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Platform port
// ───────────────────────────────────────────────────────────────

/// GPIO, interrupt controller and low-power control of one chip.
///
/// Configuration methods are fallible and run once from `init()`.
/// `pending_lines` / `clear_pending` run in interrupt context and must not
/// block or allocate.
pub trait Platform: Clock {
    /// Run `f` with global interrupt delivery masked.
    fn interrupt_free<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }

    /// Make `line` an input with the given bias.
    fn configure_input(&self, line: Line, pull: Pull) -> Result<()>;

    /// Select the edge that latches the line's pending flag.
    fn set_edge(&self, line: Line, edge: Edge) -> Result<()>;

    /// Unmask the line inside its port.
    fn enable_line_interrupt(&self, line: Line) -> Result<()>;

    /// Route the port's interrupt vector to the HAL's port handler.
    fn route_port(&self, port: Port) -> Result<()>;

    /// Unmask the port's interrupt in the interrupt controller.
    fn unmask_port(&self, port: Port) -> Result<()>;

    /// Pending-status word of `port`; bit n is pin n.
    fn pending_lines(&self, port: Port) -> u32;

    /// Acknowledge the lines in `mask`.
    fn clear_pending(&self, port: Port, mask: u32);

    /// Make `line` a push-pull output driven to `high`.
    fn configure_output(&self, line: Line, high: bool) -> Result<()>;

    fn write_line(&self, line: Line, high: bool);

    fn toggle_line(&self, line: Line);

    /// Start delivering port interrupts to the handler.  Called once per
    /// successful `init()`, after the HAL is ready and outside
    /// [`interrupt_free`](Self::interrupt_free).  Edges latched before
    /// this point stay pending and are serviced as soon as it returns.
    ///
    /// The default does nothing: delivery resumes when the mask taken by
    /// `interrupt_free` is released.
    fn enable_delivery(&self) -> Result<()> {
        Ok(())
    }

    /// When enabled the core drops back to sleep straight from the
    /// handler instead of returning to the main loop.
    fn set_sleep_on_exit(&self, enabled: bool);

    /// Block in the low-power state until an interrupt is pending.
    ///
    /// Returns immediately if one is already pending, including while
    /// delivery is masked by [`interrupt_free`](Self::interrupt_free).
    fn wait_for_interrupt(&self);
}
