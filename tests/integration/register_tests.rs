//! Event register semantics as seen by the main loop.

use std::sync::Arc;
use std::thread;

use irqhal::events::EventRegister;
use irqhal::{EventKind, EventSet};

use crate::support::{BUTTON_A, BUTTON_B, STICK, mixed_hal, press_at};

#[test]
fn distinct_kinds_aggregate_repeats_collapse() {
    let hal = mixed_hal();
    press_at(&hal, BUTTON_A, 0);
    press_at(&hal, STICK, 10);
    press_at(&hal, STICK, 70); // accepted again, same kind: no queueing

    let events = hal.most_recent_events();
    assert_eq!(
        events,
        EventSet::from_iter([EventKind::LaunchpadS1, EventKind::BoosterpackJoystick])
    );
    assert_eq!(events.len(), 2);
}

#[test]
fn drain_is_destructive() {
    let hal = mixed_hal();
    press_at(&hal, BUTTON_B, 0);
    assert!(!hal.most_recent_events().is_empty());
    assert!(hal.most_recent_events().is_empty());
}

#[test]
fn peek_then_clear_style() {
    let hal = mixed_hal();
    press_at(&hal, BUTTON_A, 0);
    assert!(hal.is_set(EventKind::LaunchpadS1));
    assert!(!hal.is_set(EventKind::LaunchpadS2));
    hal.clear_all();
    assert!(!hal.is_set(EventKind::LaunchpadS1));
}

#[test]
fn take_consumes_one_kind() {
    let hal = mixed_hal();
    press_at(&hal, BUTTON_A, 0);
    press_at(&hal, BUTTON_B, 0);
    assert!(hal.take(EventKind::LaunchpadS2));
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::LaunchpadS1));
}

#[test]
fn concurrent_records_are_never_lost_by_drain() {
    let register = Arc::new(EventRegister::new());
    let writers: Vec<_> = EventKind::ALL
        .into_iter()
        .map(|kind| {
            let register = Arc::clone(&register);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    register.record(kind);
                }
            })
        })
        .collect();

    let mut seen = EventSet::new();
    while writers.iter().any(|w| !w.is_finished()) {
        seen = seen.union(register.drain());
    }
    for writer in writers {
        writer.join().unwrap();
    }
    seen = seen.union(register.drain());

    assert_eq!(seen, EventSet::from_iter(EventKind::ALL));
}
