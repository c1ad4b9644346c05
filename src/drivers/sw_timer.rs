//! Software countdown timer over a free-running millisecond counter.
//!
//! The counter is a `u32` that wraps roughly every 49.7 days.  All
//! comparisons go through `wrapping_sub`, so a timer keeps working across
//! the overflow as long as a single interval stays below 2^32 ms.
//!
//! A freshly constructed timer is already expired: its window is placed
//! so that it ended exactly at construction time.

/// Countdown timer with states {running, expired}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareTimer {
    duration_ms: u32,
    started_ms: u32,
}

impl SoftwareTimer {
    /// Construct a timer of `duration_ms` that is already expired at `now_ms`.
    pub const fn new(duration_ms: u32, now_ms: u32) -> Self {
        Self {
            duration_ms,
            started_ms: now_ms.wrapping_sub(duration_ms),
        }
    }

    /// Restart the window: deadline becomes `now_ms + duration`.
    pub fn start(&mut self, now_ms: u32) {
        self.started_ms = now_ms;
    }

    /// `true` iff `now_ms` has reached the deadline.
    pub fn is_expired(&self, now_ms: u32) -> bool {
        self.raw_elapsed(now_ms) >= self.duration_ms
    }

    pub const fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Counter value at which the current window ends (wrapping).
    pub const fn deadline(&self) -> u32 {
        self.started_ms.wrapping_add(self.duration_ms)
    }

    /// Time spent in the current window, saturating at the duration.
    pub fn elapsed_ms(&self, now_ms: u32) -> u32 {
        self.raw_elapsed(now_ms).min(self.duration_ms)
    }

    /// Time left before expiry; zero once expired.
    pub fn remaining_ms(&self, now_ms: u32) -> u32 {
        self.duration_ms - self.elapsed_ms(now_ms)
    }

    /// Progress through the current window, 0..=100.
    pub fn percent_elapsed(&self, now_ms: u32) -> u8 {
        if self.duration_ms == 0 {
            return 100;
        }
        (u64::from(self.elapsed_ms(now_ms)) * 100 / u64::from(self.duration_ms)) as u8
    }

    fn raw_elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.started_ms)
    }
}
