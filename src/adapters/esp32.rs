//! ESP32-S3 platform adapter.
//!
//! Raw `esp-idf-sys` GPIO calls, like the rest of the bring-up code.
//!
//! ## Interrupt routing
//!
//! The GPIO matrix raises a single CPU interrupt for both banks (port 0 =
//! GPIO0–31, port 1 = GPIO32–48).  One handler is registered with
//! `gpio_isr_register`, which leaves status handling to us: the handler
//! calls [`InterruptHal::service_pending`], which reads each bank's status
//! register and acknowledges it through the write-1-to-clear alias.
//!
//! The vector is allocated disabled and only enabled by
//! `enable_delivery`, after `init()` has marked the HAL ready.  Edges that
//! arrive during bring-up stay latched in the status registers and are
//! serviced on the first delivery instead of being dropped.
//!
//! ## Low-power wait
//!
//! The main task blocks on its FreeRTOS notification; the idle task then
//! parks the core in `waiti` (or automatic light sleep when power
//! management is enabled).  The port handler gives the notification after
//! every service.  Notifications are counted, so one given before the main
//! task starts waiting makes the wait return immediately.

use core::ffi::c_void;
use core::num::NonZeroU32;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::task;
use esp_idf_svc::sys::*;
use log::{debug, info};

use crate::adapters::time::MonotonicClock;
use crate::error::{HalError, Result};
use crate::hal::InterruptHal;
use crate::interrupts::{Edge, Line, Port, Pull};
use crate::pins::gpio_num;
use crate::ports::{Clock, Platform};

// ESP32-S3 GPIO status registers (TRM §6.14).
const GPIO_STATUS_REG: usize = 0x6000_4044;
const GPIO_STATUS_W1TC_REG: usize = 0x6000_404C;
const GPIO_STATUS1_REG: usize = 0x6000_4050;
const GPIO_STATUS1_W1TC_REG: usize = 0x6000_4058;

/// HAL serviced by the GPIO vector.  Written once by [`bind`].
static ACTIVE_HAL: AtomicPtr<InterruptHal<Esp32Platform>> = AtomicPtr::new(ptr::null_mut());
/// Task blocked in [`Esp32Platform::wait_for_interrupt`].
static MAIN_TASK: AtomicPtr<c_void> = AtomicPtr::new(ptr::null_mut());

/// Attach the process's HAL instance to the GPIO vector and record the
/// calling task as the one woken by interrupts.  Call before `init()`.
pub fn bind(hal: &'static InterruptHal<Esp32Platform>) {
    ACTIVE_HAL.store(ptr::from_ref(hal).cast_mut(), Ordering::Release);
    if let Some(current) = task::current() {
        MAIN_TASK.store(current.cast(), Ordering::Release);
    }
    info!("esp32: HAL bound to GPIO vector");
}

unsafe extern "C" fn gpio_isr(_arg: *mut c_void) {
    let hal = ACTIVE_HAL.load(Ordering::Acquire);
    if hal.is_null() {
        for port in [Port(0), Port(1)] {
            let (status, clear) = status_regs(port);
            // SAFETY: fixed, always-mapped GPIO status registers.
            unsafe { ptr::write_volatile(clear as *mut u32, ptr::read_volatile(status as *const u32)) };
        }
        return;
    }

    // SAFETY: `bind` only stores references with 'static lifetime.
    unsafe { &*hal }.service_pending();

    let waiter = MAIN_TASK.load(Ordering::Acquire);
    if !waiter.is_null() {
        // SAFETY: the handle was taken from a live task that never exits.
        unsafe { task::notify_and_yield(waiter.cast(), NonZeroU32::MIN) };
    }
}

/// Status and clear registers of a bank.  Ports beyond bank 1 are
/// rejected by config validation.
fn status_regs(port: Port) -> (usize, usize) {
    debug_assert!(port.0 < crate::pins::PORTS);
    if port.0 == 0 {
        (GPIO_STATUS_REG, GPIO_STATUS_W1TC_REG)
    } else {
        (GPIO_STATUS1_REG, GPIO_STATUS1_W1TC_REG)
    }
}

fn esp_check(op: &'static str, rc: esp_err_t) -> Result<()> {
    if rc == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(HalError::Platform { op, code: rc })
    }
}

/// GPIO, interrupt and sleep control for the ESP32-S3.
#[derive(Debug, Default)]
pub struct Esp32Platform {
    clock: MonotonicClock,
    /// Shared GPIO vector; null until the first `route_port`.
    vector: AtomicPtr<intr_handle_data_t>,
}

impl Esp32Platform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for Esp32Platform {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

impl Platform for Esp32Platform {
    /// The GPIO vector stays disabled until `enable_delivery`, so bring-up
    /// is already shielded from the handler.  The sleep check needs no mask
    /// because the wait is a counted notification, and blocking inside a
    /// masked section would stall the scheduler.
    fn interrupt_free<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }

    fn configure_input(&self, line: Line, pull: Pull) -> Result<()> {
        let (pull_up_en, pull_down_en) = match pull {
            Pull::None => (gpio_pullup_t_GPIO_PULLUP_DISABLE, gpio_pulldown_t_GPIO_PULLDOWN_DISABLE),
            Pull::Up => (gpio_pullup_t_GPIO_PULLUP_ENABLE, gpio_pulldown_t_GPIO_PULLDOWN_DISABLE),
            Pull::Down => (gpio_pullup_t_GPIO_PULLUP_DISABLE, gpio_pulldown_t_GPIO_PULLDOWN_ENABLE),
        };
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio_num(line),
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en,
            pull_down_en,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: gpio_config reads the struct and writes IO_MUX/GPIO registers.
        esp_check("gpio_config", unsafe { gpio_config(&cfg) })
    }

    fn set_edge(&self, line: Line, edge: Edge) -> Result<()> {
        let intr = match edge {
            Edge::Falling => gpio_int_type_t_GPIO_INTR_NEGEDGE,
            Edge::Rising => gpio_int_type_t_GPIO_INTR_POSEDGE,
        };
        // SAFETY: pin was configured as an input just before.
        esp_check("gpio_set_intr_type", unsafe { gpio_set_intr_type(gpio_num(line), intr) })
    }

    fn enable_line_interrupt(&self, line: Line) -> Result<()> {
        // SAFETY: plain register write on a configured input.
        esp_check("gpio_intr_enable", unsafe { gpio_intr_enable(gpio_num(line)) })
    }

    fn route_port(&self, port: Port) -> Result<()> {
        if !self.vector.load(Ordering::Acquire).is_null() {
            debug!("esp32: port {} shares the GPIO vector", port.0);
            return Ok(());
        }
        let mut handle: gpio_isr_handle_t = ptr::null_mut();
        // SAFETY: gpio_isr is a valid `extern "C"` handler for the process lifetime.
        let rc = unsafe {
            gpio_isr_register(
                Some(gpio_isr),
                ptr::null_mut(),
                (ESP_INTR_FLAG_LEVEL1 | ESP_INTR_FLAG_INTRDISABLED) as i32,
                &mut handle,
            )
        };
        esp_check("gpio_isr_register", rc)?;
        self.vector.store(handle, Ordering::Release);
        Ok(())
    }

    fn enable_delivery(&self) -> Result<()> {
        let handle = self.vector.load(Ordering::Acquire);
        if handle.is_null() {
            return Ok(());
        }
        // SAFETY: handle came from gpio_isr_register and is never freed.
        esp_check("esp_intr_enable", unsafe { esp_intr_enable(handle) })?;
        debug!("esp32: GPIO vector enabled");
        Ok(())
    }

    fn unmask_port(&self, port: Port) -> Result<()> {
        // Both banks share one CPU interrupt, enabled in enable_delivery.
        debug!("esp32: port {} unmasked", port.0);
        Ok(())
    }

    fn pending_lines(&self, port: Port) -> u32 {
        let (status, _) = status_regs(port);
        // SAFETY: fixed, always-mapped GPIO status register.
        unsafe { ptr::read_volatile(status as *const u32) }
    }

    fn clear_pending(&self, port: Port, mask: u32) {
        let (_, clear) = status_regs(port);
        // SAFETY: write-1-to-clear alias; bits outside `mask` are untouched.
        unsafe { ptr::write_volatile(clear as *mut u32, mask) };
    }

    fn configure_output(&self, line: Line, high: bool) -> Result<()> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio_num(line),
            // Input stays enabled so toggle can read the driven level back.
            mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: as in configure_input.
        esp_check("gpio_config", unsafe { gpio_config(&cfg) })?;
        // SAFETY: pin is now an output.
        esp_check("gpio_set_level", unsafe { gpio_set_level(gpio_num(line), u32::from(high)) })
    }

    fn write_line(&self, line: Line, high: bool) {
        // SAFETY: pin was validated and configured in configure_output.
        unsafe { gpio_set_level(gpio_num(line), u32::from(high)) };
    }

    fn toggle_line(&self, line: Line) {
        let gpio = gpio_num(line);
        // SAFETY: input-output pin; reading returns the driven level.
        unsafe {
            let level = gpio_get_level(gpio);
            gpio_set_level(gpio, u32::from(level == 0));
        }
    }

    fn set_sleep_on_exit(&self, enabled: bool) {
        // Xtensa has no sleep-on-exit; handlers always return to the task.
        debug!("esp32: sleep-on-exit {} (not applicable)", enabled);
    }

    fn wait_for_interrupt(&self) {
        task::wait_notification(BLOCK);
    }
}
