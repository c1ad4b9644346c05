//! Interrupt-driven button HAL.
//!
//! Turns bouncy GPIO edge interrupts into debounced events that a single
//! main loop drains after each low-power wait.  Everything except the
//! ESP32 adapter is plain logic over the [`ports::Platform`] trait and
//! runs on the host against [`adapters::sim::SimPlatform`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod hal;
pub mod interrupts;
pub mod pins;
pub mod ports;
pub mod power;

pub use config::HalConfig;
pub use error::{ConfigError, HalError, Result};
pub use events::{EventKind, EventSet};
pub use hal::InterruptHal;
pub use power::WakeReason;
