//! Demo dispatcher against the compiled-in board map.

use irqhal::app::service::TapToggle;
use irqhal::{EventKind, EventSet, pins};

use crate::support::{board_hal, press_at};

#[test]
fn taps_toggle_their_leds_across_wakes() {
    let hal = board_hal();
    let mut app = TapToggle::new(&hal);
    app.start();

    press_at(&hal, pins::LAUNCHPAD_S1, 0);
    assert_eq!(app.step(), EventSet::from(EventKind::LaunchpadS1));
    assert_eq!(hal.platform().output(pins::LED2_RED), Some(false));

    // Bounce 100 ms later on a 300 ms button: nothing to dispatch.
    press_at(&hal, pins::LAUNCHPAD_S1, 100);
    assert!(app.step().is_empty());
    assert_eq!(hal.platform().output(pins::LED2_RED), Some(false));

    press_at(&hal, pins::BOOSTERPACK_JOYSTICK, 120);
    press_at(&hal, pins::LAUNCHPAD_S1, 400);
    assert_eq!(
        app.step(),
        EventSet::from_iter([EventKind::LaunchpadS1, EventKind::BoosterpackJoystick])
    );
    assert_eq!(hal.platform().output(pins::LED2_RED), Some(true));
    assert_eq!(hal.platform().output(pins::LED1), Some(false));

    assert_eq!(app.taps(EventKind::LaunchpadS1), 2);
    assert_eq!(app.wakes(), 3);
}

#[test]
fn press_during_sleep_reaches_the_dispatcher() {
    let hal = board_hal();
    let mut app = TapToggle::new(&hal);
    app.start();

    hal.platform().press_during_next_wait(pins::BOOSTERPACK_JOYSTICK);
    // The wait returns with the line latched; the vector then runs.
    hal.sleep();
    hal.service_pending();
    app.dispatch(hal.most_recent_events());
    assert_eq!(hal.platform().output(pins::LED1), Some(false));
}
