//! Monotonic millisecond clock.
//!
//! - **ESP-IDF**: wraps `esp_timer_get_time()` (64-bit µs since boot,
//!   callable from interrupt context) and truncates to a wrapping `u32`.
//! - **Host**: uses `std::time::Instant` for simulation and tests.

use crate::ports::Clock;

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    #[cfg(not(all(feature = "espidf", target_os = "espidf")))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(all(feature = "espidf", target_os = "espidf")))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot.
    #[cfg(all(feature = "espidf", target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads the system timer; no preconditions.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since this clock was created.
    #[cfg(not(all(feature = "espidf", target_os = "espidf")))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        (self.uptime_us() / 1_000) as u32
    }
}
