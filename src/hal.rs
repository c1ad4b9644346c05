//! Interrupt HAL facade.
//!
//! Owns the platform, every interrupt source, the indicator outputs, the
//! event register and the power controller.  One instance per process;
//! the firmware entry point creates it and hands the port handler a
//! reference to it, so there is no file-scope HAL state.
//!
//! ```text
//!  main loop                          interrupt context
//!  ─────────                          ─────────────────
//!  init()
//!  loop {
//!      sleep()  ◀──── wake ────────── service_port(port)
//!      most_recent_events()               ├─ gate.accept(now)
//!      dispatch                           ├─ events.record(kind)
//!  }                                      └─ clear_pending(port)
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use log::{debug, info, warn};

use crate::config::HalConfig;
use crate::drivers::indicator::{Indicator, IndicatorBank};
use crate::error::{HalError, Result};
use crate::events::{EventKind, EventRegister, EventSet};
use crate::interrupts::{Port, ServiceReport, SourceTable};
use crate::power::{PowerController, WakeReason};
use crate::ports::Platform;

const UNINIT: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;

pub struct InterruptHal<P: Platform> {
    platform: P,
    sources: SourceTable,
    indicators: IndicatorBank,
    events: EventRegister,
    power: PowerController,
    state: AtomicU8,
}

impl<P: Platform> InterruptHal<P> {
    /// Validate `config` and build the HAL.  No hardware is touched until
    /// [`init`](Self::init).
    pub fn new(platform: P, config: &HalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            platform,
            sources: SourceTable::from_configs(&config.sources)?,
            indicators: IndicatorBank::from_configs(&config.indicators)?,
            events: EventRegister::new(),
            power: PowerController::new(),
            state: AtomicU8::new(UNINIT),
        })
    }

    /// Bring up every source and indicator with global interrupts masked.
    ///
    /// Call once at startup.  Later calls are no-ops; a call that overlaps
    /// a running `init` returns [`HalError::ReentrantInit`].
    pub fn init(&self) -> Result<()> {
        match self
            .state
            .compare_exchange(UNINIT, INITIALIZING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {}
            Err(READY) => {
                debug!("hal: already initialised");
                return Ok(());
            }
            Err(_) => return Err(HalError::ReentrantInit),
        }

        if let Err(e) = self.platform.interrupt_free(|| self.configure()) {
            self.state.store(UNINIT, Ordering::Release);
            warn!("hal: init failed: {e}");
            return Err(e);
        }

        // READY first: anything latched during bring-up is serviced, not
        // dropped as stray, once delivery starts.
        self.state.store(READY, Ordering::Release);
        if let Err(e) = self.platform.enable_delivery() {
            self.state.store(UNINIT, Ordering::Release);
            warn!("hal: enabling interrupt delivery failed: {e}");
            return Err(e);
        }

        info!(
            "hal: {} sources, {} indicators ready",
            self.sources.len(),
            self.indicators.len()
        );
        Ok(())
    }

    fn configure(&self) -> Result<()> {
        self.events.clear_all();
        self.sources.reset_gates();

        for source in self.sources.iter() {
            let line = source.line();
            self.platform.configure_input(line, source.pull())?;
            self.platform.set_edge(line, source.edge())?;
            // Drop anything latched while the pin floated during reset.
            self.platform.clear_pending(line.port, line.mask());
            self.platform.enable_line_interrupt(line)?;
            debug!(
                "hal: {} on {} ({:?}, {} ms)",
                source.kind(),
                line,
                source.edge(),
                source.cooldown_ms()
            );
        }

        for port in self.sources.ports() {
            self.platform.route_port(port)?;
            self.platform.unmask_port(port)?;
        }

        self.indicators.configure(&self.platform)?;
        self.platform.set_sleep_on_exit(false);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    // ── Interrupt context ─────────────────────────────────────

    /// Port handler body.  Call from the port's interrupt vector.
    ///
    /// Every pending line that was read is acknowledged, whether its edge
    /// was accepted, rejected as bounce, or belongs to no source.
    pub fn service_port(&self, port: Port) -> ServiceReport {
        let pending = self.platform.pending_lines(port);
        if pending == 0 {
            return ServiceReport::default();
        }

        let report = if self.is_initialized() {
            self.sources
                .service(port, pending, self.platform.now_ms(), &self.events)
        } else {
            ServiceReport {
                stray: pending,
                ..ServiceReport::default()
            }
        };

        self.platform.clear_pending(port, pending);
        report
    }

    /// Service every routed port.  For vectors shared by several ports.
    pub fn service_pending(&self) -> ServiceReport {
        self.sources
            .ports()
            .into_iter()
            .fold(ServiceReport::default(), |acc, port| {
                acc.merge(self.service_port(port))
            })
    }

    // ── Main-loop context ─────────────────────────────────────

    /// Every event since the previous call; clears the register.
    pub fn most_recent_events(&self) -> EventSet {
        self.events.drain()
    }

    /// Peek at one kind without clearing it.
    pub fn is_set(&self, kind: EventKind) -> bool {
        self.events.is_set(kind)
    }

    /// Consume one kind, leaving the others pending.
    pub fn take(&self, kind: EventKind) -> bool {
        self.events.take(kind)
    }

    /// Clear every pending kind (pairs with [`is_set`](Self::is_set)).
    pub fn clear_all(&self) {
        self.events.clear_all();
    }

    /// Low-power wait until the next interrupt.  See [`crate::power`].
    pub fn sleep(&self) -> WakeReason {
        self.power.sleep(&self.platform, &self.events)
    }

    pub fn indicator_on(&self, indicator: Indicator) {
        self.indicators.turn_on(&self.platform, indicator);
    }

    pub fn indicator_off(&self, indicator: Indicator) {
        self.indicators.turn_off(&self.platform, indicator);
    }

    pub fn indicator_toggle(&self, indicator: Indicator) {
        self.indicators.toggle(&self.platform, indicator);
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn power(&self) -> &PowerController {
        &self.power
    }

    pub fn sources(&self) -> &SourceTable {
        &self.sources
    }
}
