//! Adapters: concrete implementations of the platform port traits.
//!
//! | Adapter | Implements        | Connects to                      |
//! |---------|-------------------|----------------------------------|
//! | `esp32` | Platform + Clock  | ESP32-S3 GPIO matrix, FreeRTOS   |
//! | `sim`   | Platform + Clock  | In-memory ports, manual clock    |
//! | `time`  | Clock             | ESP32 system timer / host clock  |

#[cfg(all(feature = "espidf", target_os = "espidf"))]
pub mod esp32;
pub mod sim;
pub mod time;
