//! GPIO pin assignments for the button board.
//!
//! Single source of truth: [`HalConfig::default`](crate::config::HalConfig)
//! builds the board map from these constants rather than hard-coding
//! pin numbers.
//!
//! On the ESP32-S3 the GPIO matrix is split into two interrupt banks:
//! port 0 carries GPIO0–31 and port 1 carries GPIO32–48.  A line's GPIO
//! number is `port * 32 + pin`.

use crate::interrupts::{Line, PINS_PER_PORT};

// ---------------------------------------------------------------------------
// Launchpad buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// S1, shared with the BOOT strap button on the dev kit.
pub const LAUNCHPAD_S1: Line = Line::new(0, 0);
/// S2.
pub const LAUNCHPAD_S2: Line = Line::new(0, 14);

// ---------------------------------------------------------------------------
// Boosterpack inputs (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const BOOSTERPACK_S1: Line = Line::new(0, 15);
pub const BOOSTERPACK_S2: Line = Line::new(0, 16);
/// Joystick select switch.
pub const BOOSTERPACK_JOYSTICK: Line = Line::new(0, 17);

// ---------------------------------------------------------------------------
// Indicator LEDs (active HIGH)
// ---------------------------------------------------------------------------

/// LED1 (GPIO38).
pub const LED1: Line = Line::new(1, 6);
/// LED2, red channel (GPIO39).
pub const LED2_RED: Line = Line::new(1, 7);

/// Interrupt banks on the ESP32-S3.
pub const PORTS: u8 = 2;
/// Highest GPIO number bonded out on the ESP32-S3.
pub const MAX_GPIO: i32 = 48;

/// GPIO number of `line` on the ESP32-S3.
pub const fn gpio_num(line: Line) -> i32 {
    line.port.0 as i32 * 32 + line.pin as i32
}

/// `true` if `line` is a GPIO the ESP32-S3 actually has.  GPIO22–25 are
/// not bonded out.
pub const fn exists(line: Line) -> bool {
    if line.port.0 >= PORTS || line.pin >= PINS_PER_PORT {
        return false;
    }
    let gpio = gpio_num(line);
    gpio <= MAX_GPIO && !matches!(gpio, 22..=25)
}
