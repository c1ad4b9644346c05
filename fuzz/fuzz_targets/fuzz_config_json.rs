//! Fuzz target: `HalConfig::from_json`
//!
//! Feeds arbitrary bytes to the board-configuration loader and asserts
//! that it never panics and that anything it accepts can actually build
//! and initialise a HAL.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use irqhal::adapters::sim::SimPlatform;
use irqhal::{HalConfig, InterruptHal};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = HalConfig::from_json(text) {
        let hal = InterruptHal::new(SimPlatform::new(), &config)
            .expect("validated config must build");
        hal.init().expect("validated config must initialise");
        assert!(hal.is_initialized());
    }
});
