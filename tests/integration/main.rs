//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that drives the full HAL (config →
//! init → port handler → event register → sleep → drain) against the
//! simulated platform.  All tests run on the host with no hardware.

mod app_tests;
mod debounce_tests;
mod register_tests;
mod sleep_tests;
mod support;
