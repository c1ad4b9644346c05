//! Edge filtering through the full port-handler path.

use irqhal::interrupts::Line;
use irqhal::pins;
use irqhal::{EventKind, EventSet};

use crate::support::{BUTTON_A, BUTTON_B, PORT_A, STICK, board_hal, mixed_hal, press_at};

#[test]
fn first_edge_after_boot_is_accepted_for_every_source() {
    let hal = board_hal();
    let lines = [
        (pins::LAUNCHPAD_S1, EventKind::LaunchpadS1),
        (pins::LAUNCHPAD_S2, EventKind::LaunchpadS2),
        (pins::BOOSTERPACK_S1, EventKind::BoosterpackS1),
        (pins::BOOSTERPACK_S2, EventKind::BoosterpackS2),
        (pins::BOOSTERPACK_JOYSTICK, EventKind::BoosterpackJoystick),
    ];
    for (line, _) in lines {
        // t = 0: the timer was never started, yet the edge must pass.
        press_at(&hal, line, 0);
    }
    let expected: EventSet = lines.iter().map(|&(_, kind)| kind).collect();
    assert_eq!(hal.most_recent_events(), expected);
}

#[test]
fn bounce_burst_yields_one_event() {
    let hal = mixed_hal();
    for t in [1_000, 1_002, 1_005, 1_011, 1_040, 1_299] {
        press_at(&hal, BUTTON_A, t);
    }
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::LaunchpadS1));
    assert!(hal.most_recent_events().is_empty());
}

#[test]
fn fifty_ms_source_reopens_after_window() {
    let hal = mixed_hal();
    press_at(&hal, STICK, 0);
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::BoosterpackJoystick));

    press_at(&hal, STICK, 30);
    assert!(hal.most_recent_events().is_empty());

    press_at(&hal, STICK, 60);
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::BoosterpackJoystick));
}

#[test]
fn each_source_keeps_its_own_window() {
    let hal = mixed_hal();
    press_at(&hal, BUTTON_A, 0);
    press_at(&hal, STICK, 0);
    assert_eq!(
        hal.most_recent_events(),
        EventSet::from_iter([EventKind::LaunchpadS1, EventKind::BoosterpackJoystick])
    );

    press_at(&hal, BUTTON_A, 60);
    press_at(&hal, STICK, 60);
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::BoosterpackJoystick));
}

#[test]
fn shared_port_lines_are_demultiplexed() {
    let hal = mixed_hal();
    hal.platform().set_time(5);
    hal.platform().press(BUTTON_A);
    hal.platform().press(BUTTON_B);

    let report = hal.service_port(PORT_A);
    assert_eq!(report.accepted.len(), 2);
    assert_eq!(report.stray, 0);
    assert_eq!(hal.platform().pending(PORT_A), 0);
}

#[test]
fn unregistered_line_is_cleared_without_event() {
    let hal = mixed_hal();
    let stray = Line::new(1, 9);
    hal.platform().glitch(stray);

    let report = hal.service_port(PORT_A);
    assert_eq!(report.stray, stray.mask());
    assert!(report.accepted.is_empty());
    assert_eq!(hal.platform().pending(PORT_A), 0);
    assert!(hal.most_recent_events().is_empty());
}

#[test]
fn rejected_edge_is_still_acknowledged() {
    let hal = mixed_hal();
    press_at(&hal, BUTTON_A, 0);
    hal.platform().set_time(10);
    hal.platform().press(BUTTON_A);

    let report = hal.service_port(PORT_A);
    assert_eq!(report.rejected, 1);
    assert_eq!(hal.platform().pending(PORT_A), 0);
}

#[test]
fn windows_survive_counter_wrap() {
    let hal = mixed_hal();
    press_at(&hal, BUTTON_A, u32::MAX - 100);
    hal.most_recent_events();

    press_at(&hal, BUTTON_A, 100); // 201 ms later, across the wrap
    assert!(hal.most_recent_events().is_empty());

    press_at(&hal, BUTTON_A, 199); // exactly 300 ms later
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::LaunchpadS1));
}
