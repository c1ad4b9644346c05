//! Sleep/wake cycle and the lost-wake window.

use irqhal::adapters::sim::SimCall;
use irqhal::{EventKind, EventSet, WakeReason};

use crate::support::{BUTTON_A, STICK, mixed_hal, press_at};

#[test]
fn idle_sleep_enters_wait() {
    let hal = mixed_hal();
    hal.platform().clear_journal();

    assert_eq!(hal.sleep(), WakeReason::Interrupt);
    assert_eq!(
        hal.platform().journal(),
        vec![SimCall::MaskInterrupts, SimCall::Wait, SimCall::UnmaskInterrupts]
    );
}

#[test]
fn event_recorded_before_sleep_is_not_lost() {
    let hal = mixed_hal();
    // Edge lands after the last drain but before the main loop sleeps.
    press_at(&hal, BUTTON_A, 0);

    assert_eq!(hal.sleep(), WakeReason::AlreadyPending);
    assert_eq!(hal.platform().waits(), 0);
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::LaunchpadS1));
    assert_eq!(hal.power().immediate_wakes(), 1);
}

#[test]
fn edge_during_wait_is_seen_after_wake() {
    let hal = mixed_hal();
    hal.platform().set_time(40);
    hal.platform().press_during_next_wait(STICK);

    assert_eq!(hal.sleep(), WakeReason::Interrupt);
    // Delivery resumes once the mask is released: the vector runs.
    let report = hal.service_pending();
    assert_eq!(report.accepted, EventSet::from(EventKind::BoosterpackJoystick));
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::BoosterpackJoystick));
}

#[test]
fn unserviced_pending_line_short_circuits_wait() {
    let hal = mixed_hal();
    // Latched between the register check and the wait instruction.
    hal.platform().press(BUTTON_A);

    hal.sleep();
    assert_eq!(hal.platform().waits(), 0);
    hal.service_pending();
    assert_eq!(hal.most_recent_events(), EventSet::from(EventKind::LaunchpadS1));
}

#[test]
fn sleep_leaves_register_for_the_drain() {
    let hal = mixed_hal();
    press_at(&hal, STICK, 0);
    hal.sleep();
    hal.sleep();
    assert_eq!(hal.power().sleep_cycles(), 2);
    assert!(hal.is_set(EventKind::BoosterpackJoystick));
}
