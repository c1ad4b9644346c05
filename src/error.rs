//! Unified error types for the interrupt HAL.
//!
//! A single `HalError` enum that every subsystem converts into, so the
//! firmware entry point and the tests handle failures uniformly.  All
//! variants are `Copy`; nothing on the error path allocates.
//!
//! Bounce rejection and stray interrupt lines are *not* errors; they are
//! expected conditions handled silently by the debounce and dispatch code.

use core::fmt;

use crate::events::EventKind;
use crate::drivers::indicator::Indicator;
use crate::interrupts::Line;

// ---------------------------------------------------------------------------
// Top-level HAL error
// ---------------------------------------------------------------------------

/// Every fallible HAL operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Board configuration was rejected before any hardware was touched.
    Config(ConfigError),
    /// A platform call failed.  `code` is the vendor return code.
    Platform { op: &'static str, code: i32 },
    /// `init()` was entered while another `init()` was still running.
    ReentrantInit,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Platform { op, code } => write!(f, "platform: {op} failed (rc={code})"),
            Self::ReentrantInit => write!(f, "init re-entered before completing"),
        }
    }
}

impl std::error::Error for HalError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    Parse,
    /// No interrupt source was configured.
    NoSources,
    /// More sources or indicators than the fixed-capacity tables hold.
    TooMany,
    /// Pin index does not exist on its port.
    InvalidLine(Line),
    /// Two entries claim the same physical line.
    DuplicateLine(Line),
    /// Two sources report the same event kind.
    DuplicateKind(EventKind),
    /// The same indicator is mapped twice.
    DuplicateIndicator(Indicator),
    /// Debounce window longer than [`MAX_COOLDOWN_MS`](crate::config::MAX_COOLDOWN_MS).
    CooldownOutOfRange(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "malformed configuration"),
            Self::NoSources => write!(f, "no interrupt sources configured"),
            Self::TooMany => write!(f, "too many entries for fixed-capacity table"),
            Self::InvalidLine(line) => write!(f, "invalid line {line}"),
            Self::DuplicateLine(line) => write!(f, "line {line} assigned twice"),
            Self::DuplicateKind(kind) => write!(f, "event kind {kind} assigned twice"),
            Self::DuplicateIndicator(ind) => write!(f, "indicator {ind:?} assigned twice"),
            Self::CooldownOutOfRange(ms) => write!(f, "debounce window {ms} ms out of range"),
        }
    }
}

impl From<ConfigError> for HalError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// HAL-wide `Result` alias.
pub type Result<T> = core::result::Result<T, HalError>;
