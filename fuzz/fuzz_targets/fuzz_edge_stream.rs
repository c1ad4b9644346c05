//! Fuzz target: edge stream through the port handler
//!
//! Interprets the input as (line, gap) pairs, presses the board-map
//! buttons at those timings and checks:
//! - No panics, including across clock wrap
//! - Every serviced port is left with no pending bits
//! - Per source, accepted edges are at least one cooldown apart
//!
//! cargo fuzz run fuzz_edge_stream

#![no_main]

use irqhal::adapters::sim::SimPlatform;
use irqhal::interrupts::Line;
use irqhal::ports::Clock;
use irqhal::{EventKind, HalConfig, InterruptHal};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = HalConfig::default();
    let hal = InterruptHal::new(SimPlatform::new(), &config).expect("default config");
    hal.init().expect("init");

    let sources: Vec<(Line, EventKind, u32)> = config
        .sources
        .iter()
        .map(|s| (s.line, s.kind, s.cooldown_ms))
        .collect();
    let mut last: Vec<Option<u32>> = vec![None; sources.len()];

    if let Some(&first) = data.first() {
        hal.platform().set_time(u32::MAX - u32::from(first) * 4);
    }

    for pair in data.chunks_exact(2) {
        let idx = usize::from(pair[0]) % sources.len();
        let (line, kind, cooldown) = sources[idx];
        hal.platform().advance(u32::from(pair[1]));
        hal.platform().press(line);

        let report = hal.service_port(line.port);
        assert_eq!(hal.platform().pending(line.port), 0);

        if report.accepted.contains(kind) {
            let now = hal.platform().now_ms();
            if let Some(prev) = last[idx] {
                assert!(now.wrapping_sub(prev) >= cooldown);
            }
            last[idx] = Some(now);
        }
    }
    let _ = hal.most_recent_events();
});
