//! Cooperative single-threaded loop driver.
//!
//! The narrate half of the decide/narrate split: the state machine only
//! *requests* pauses; this module performs them. One service tick runs to
//! completion, then the loop sleeps for the configured duration of the
//! pause that tick returned. There is no parallelism and no preemption —
//! the apparatus is single-purpose and the run-to-completion semantics of
//! each tick are part of the controller's contract.

use crate::app::ports::{ActuatorPort, ClockPort, DisplayPort, EventSink, InputPort, LevelPort};
use crate::app::service::CycleService;

/// One loop iteration: tick the service, then sleep out the pause.
fn step(
    service: &mut CycleService,
    hw: &mut (impl InputPort + LevelPort + ActuatorPort + DisplayPort),
    clock: &mut impl ClockPort,
    sink: &mut impl EventSink,
) {
    let pause = service.tick(hw, clock, sink);
    let ms = pause.millis(&service.config().timing);
    if ms > 0 {
        clock.sleep_ms(ms);
    }
}

/// Drive the controller forever. The firmware entry point.
pub fn run_forever(
    service: &mut CycleService,
    hw: &mut (impl InputPort + LevelPort + ActuatorPort + DisplayPort),
    clock: &mut impl ClockPort,
    sink: &mut impl EventSink,
) -> ! {
    loop {
        step(service, hw, clock, sink);
    }
}

/// Drive the controller for exactly `n` ticks. Test harness entry point.
pub fn run_ticks(
    n: u32,
    service: &mut CycleService,
    hw: &mut (impl InputPort + LevelPort + ActuatorPort + DisplayPort),
    clock: &mut impl ClockPort,
    sink: &mut impl EventSink,
) {
    for _ in 0..n {
        step(service, hw, clock, sink);
    }
}
