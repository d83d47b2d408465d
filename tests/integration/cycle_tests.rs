//! Integration tests for the running cycle: the operating scenarios,
//! the sensor fail-safe, and the transition cues, all driven through the
//! full service + runner stack.

use crate::mock_hw::{ManualClock, MockHardware, RecordingSink};

use tankcycle::app::events::CycleEvent;
use tankcycle::app::service::CycleService;
use tankcycle::config::CycleConfig;
use tankcycle::fsm::context::{Button, Pump};
use tankcycle::fsm::{Mode, Phase, State};
use tankcycle::runner::run_ticks;

fn start_at(
    mode: Mode,
    phase: Phase,
) -> (CycleService, MockHardware, ManualClock, RecordingSink) {
    let mut service = CycleService::new(CycleConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let clock = ManualClock::new();
    service.start_from(mode, phase, &mut hw, &mut sink);
    (service, hw, clock, sink)
}

fn running(mode: Mode, phase: Phase) -> State {
    State::Running { mode, phase }
}

// ── Auto Load: fill until the surface reaches the full mark ───

#[test]
fn auto_load_pumps_until_full_then_advances() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Auto, Phase::Load);
    // Entry tick consumes one reading; then 50, 50, 8 against the
    // 10 cm full threshold.
    hw.queue_levels(&[Some(50.0), Some(50.0), Some(50.0), Some(8.0)]);

    run_ticks(3, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(hw.pump_on(Pump::Load), "still filling at 50 cm");
    assert_eq!(service.state(), running(Mode::Auto, Phase::Load));

    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(!hw.pump_on(Pump::Load), "pump stops before the transition");
    assert_eq!(service.state(), running(Mode::Auto, Phase::Air));
    assert_eq!(hw.shown(1), Some("Next phase..."));
    assert!(sink.saw(&CycleEvent::PhaseChanged {
        from: Phase::Load,
        to: Phase::Air
    }));

    // Air entry on the next tick: only the air pump runs.
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(hw.pump_on(Pump::Air));
    assert_eq!(hw.pumps_on(), 1);
}

// ── Auto Air: run for the configured duration ─────────────────

#[test]
fn auto_air_runs_for_the_duration_then_advances() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Auto, Phase::Air);

    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink); // entry at t=0
    assert!(hw.pump_on(Pump::Air));

    clock.now = 5_000;
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(hw.pump_on(Pump::Air));
    assert_eq!(service.state(), running(Mode::Auto, Phase::Air));
    assert_eq!(hw.shown(1), Some("5.0/20.0"));

    clock.now = 12_000;
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(hw.pump_on(Pump::Air));

    clock.now = 20_000;
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(!hw.pump_on(Pump::Air));
    assert_eq!(service.state(), running(Mode::Auto, Phase::Wait));
}

// ── Manual Unload: skip advances with no level check ──────────

#[test]
fn manual_skip_advances_immediately() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Manual, Phase::Unload);
    hw.hold_level = None; // sensor silent the whole time

    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink); // entry
    assert!(hw.pump_on(Pump::Drain));

    hw.press(Button::Right);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(service.state(), running(Mode::Manual, Phase::Load));
    assert_eq!(hw.shown(1), Some("Next phase..."));

    // Exit completes at Load entry: drain released, load pump on.
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(!hw.pump_on(Pump::Drain));
    assert!(hw.pump_on(Pump::Load));
}

#[test]
fn skip_does_nothing_in_auto_mode() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Auto, Phase::Wait);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);

    hw.press(Button::Right);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(service.state(), running(Mode::Auto, Phase::Wait));
}

// ── Manual Load: force keeps the pump on past the threshold ───

#[test]
fn manual_force_keeps_pump_running_past_full() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Manual, Phase::Load);
    hw.hold_level = Some(50.0);

    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink); // entry
    let timing = service.config().timing.clone();
    let before_hold = clock.now;

    hw.press(Button::Select);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    // The first Select arms and holds for the confirmation window.
    assert_eq!(clock.now - before_hold, u64::from(timing.force_hold_ms));

    hw.press(Button::Select);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(sink.saw(&CycleEvent::ForceEngaged(Phase::Load)));

    // Surface well past the would-be Auto threshold; pump stays on.
    hw.hold_level = Some(5.0);
    run_ticks(3, &mut service, &mut hw, &mut clock, &mut sink);
    assert!(hw.pump_on(Pump::Load));
    assert_eq!(service.state(), running(Mode::Manual, Phase::Load));
}

#[test]
fn unforced_manual_pump_stops_at_the_threshold() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Manual, Phase::Load);
    hw.hold_level = Some(5.0);

    run_ticks(2, &mut service, &mut hw, &mut clock, &mut sink); // entry + one update
    assert!(!hw.pump_on(Pump::Load), "full tank, no force: pump off");
    assert_eq!(
        service.state(),
        running(Mode::Manual, Phase::Load),
        "manual mode never auto-advances"
    );
}

#[test]
fn manual_mode_never_advances_on_elapsed_time() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Manual, Phase::Air);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);

    clock.now = 120_000; // far past the configured aeration time
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(service.state(), running(Mode::Manual, Phase::Air));
    assert!(!hw.pump_on(Pump::Air), "unforced pump off past the duration");
}

// ── Sensor fail-safe ──────────────────────────────────────────

#[test]
fn silent_sensor_never_completes_a_level_phase() {
    for reading in [None, Some(0.0), Some(-3.0)] {
        let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Auto, Phase::Load);
        hw.hold_level = reading;

        run_ticks(20, &mut service, &mut hw, &mut clock, &mut sink);
        assert_eq!(
            service.state(),
            running(Mode::Auto, Phase::Load),
            "reading {reading:?} must not count as full"
        );
        assert!(hw.pump_on(Pump::Load), "pump keeps trying to fill");
    }
}

#[test]
fn silent_sensor_never_completes_unload() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Auto, Phase::Unload);
    hw.hold_level = None;

    run_ticks(20, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(service.state(), running(Mode::Auto, Phase::Unload));
    assert!(hw.pump_on(Pump::Drain));
}

// ── A complete Auto cycle ─────────────────────────────────────

#[test]
fn auto_cycle_walks_all_four_phases_in_order() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Auto, Phase::Load);
    hw.hold_level = Some(50.0);

    run_ticks(2, &mut service, &mut hw, &mut clock, &mut sink); // entry + filling
    hw.hold_level = Some(8.0);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(service.state(), running(Mode::Auto, Phase::Air));

    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink); // Air entry
    clock.now += 20_000;
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(service.state(), running(Mode::Auto, Phase::Wait));

    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink); // Wait entry
    assert_eq!(hw.pumps_on(), 0, "rest phase drives no pump");
    clock.now += 20_000;
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(service.state(), running(Mode::Auto, Phase::Unload));

    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink); // Unload entry
    assert!(hw.pump_on(Pump::Drain));
    hw.hold_level = Some(31.0);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(service.state(), running(Mode::Auto, Phase::Load));

    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            CycleEvent::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (Phase::Load, Phase::Air),
            (Phase::Air, Phase::Wait),
            (Phase::Wait, Phase::Unload),
            (Phase::Unload, Phase::Load),
        ]
    );
}

// ── Display discipline ────────────────────────────────────────

#[test]
fn status_line_updates_only_when_the_numbers_change() {
    let (mut service, mut hw, mut clock, mut sink) = start_at(Mode::Auto, Phase::Load);
    hw.hold_level = Some(50.0);

    run_ticks(2, &mut service, &mut hw, &mut clock, &mut sink); // entry + first status
    assert_eq!(hw.shown(1), Some("50.0/10.0"));
    let writes = hw.lines.len();

    // Same reading: nothing is rewritten.
    run_ticks(3, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.lines.len(), writes);

    // New reading: exactly one more line write.
    hw.hold_level = Some(42.0);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.lines.len(), writes + 1);
    assert_eq!(hw.shown(1), Some("42.0/10.0"));
}
