//! Shared fixtures for the integration tests.

use irqhal::adapters::sim::SimPlatform;
use irqhal::config::SourceConfig;
use irqhal::drivers::debounce::{BOOSTERPACK_COOLDOWN_MS, LAUNCHPAD_COOLDOWN_MS};
use irqhal::interrupts::{Line, Port};
use irqhal::{EventKind, HalConfig, InterruptHal};

pub const PORT_A: Port = Port(1);
pub const BUTTON_A: Line = Line::new(1, 1);
pub const BUTTON_B: Line = Line::new(1, 4);
pub const STICK: Line = Line::new(0, 5);

/// Board map compiled into the firmware, initialised.
pub fn board_hal() -> InterruptHal<SimPlatform> {
    ready(HalConfig::default())
}

/// Two 300 ms buttons sharing port 1 and one 50 ms input on port 0.
pub fn mixed_hal() -> InterruptHal<SimPlatform> {
    let mut config = HalConfig::default();
    config.indicators.clear();
    config.sources.clear();
    for source in [
        SourceConfig::button(EventKind::LaunchpadS1, BUTTON_A, LAUNCHPAD_COOLDOWN_MS),
        SourceConfig::button(EventKind::LaunchpadS2, BUTTON_B, LAUNCHPAD_COOLDOWN_MS),
        SourceConfig::button(EventKind::BoosterpackJoystick, STICK, BOOSTERPACK_COOLDOWN_MS),
    ] {
        config.sources.push(source).unwrap();
    }
    ready(config)
}

fn ready(config: HalConfig) -> InterruptHal<SimPlatform> {
    let hal = InterruptHal::new(SimPlatform::new(), &config).expect("valid config");
    hal.init().expect("init");
    hal
}

/// Press `line` at `at_ms` and run the port handler, as the vector would.
pub fn press_at(hal: &InterruptHal<SimPlatform>, line: Line, at_ms: u32) {
    hal.platform().set_time(at_ms);
    hal.platform().press(line);
    hal.service_port(line.port);
}
