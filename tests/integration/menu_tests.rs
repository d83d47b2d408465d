//! Integration tests for the pre-cycle selection menu.
//!
//! Drive the full service + runner stack with scripted button presses and
//! assert on the rendered screen, the selection events, and the pause
//! cadence.

use crate::mock_hw::{ManualClock, MockHardware, RecordingSink};

use tankcycle::app::events::CycleEvent;
use tankcycle::app::service::CycleService;
use tankcycle::config::CycleConfig;
use tankcycle::fsm::context::{Button, Pump};
use tankcycle::fsm::{MenuStage, Mode, Phase, State};
use tankcycle::runner::run_ticks;

fn make_menu() -> (CycleService, MockHardware, ManualClock, RecordingSink) {
    let mut service = CycleService::new(CycleConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let clock = ManualClock::new();
    service.start(&mut hw, &mut sink);
    (service, hw, clock, sink)
}

#[test]
fn boot_renders_the_mode_prompt() {
    let (mut service, mut hw, mut clock, mut sink) = make_menu();

    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);

    assert_eq!(service.state(), State::Menu(MenuStage::SelectMode));
    assert_eq!(hw.shown(0), Some("Choose mode:"));
    assert_eq!(hw.shown(1), Some("Manual"));
}

#[test]
fn mode_cursor_wraps_in_both_directions() {
    let (mut service, mut hw, mut clock, mut sink) = make_menu();
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink); // prompt

    // Next from the last candidate wraps to the first.
    hw.press(Button::Up);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.shown(1), Some("Auto"));
    hw.press(Button::Up);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.shown(1), Some("Manual"));

    // Previous from the first candidate wraps to the last.
    hw.press(Button::Down);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.shown(1), Some("Auto"));
}

#[test]
fn phase_cursor_wraps_over_all_four_candidates() {
    let (mut service, mut hw, mut clock, mut sink) = make_menu();
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);

    hw.press(Button::Select); // commit Manual
    run_ticks(2, &mut service, &mut hw, &mut clock, &mut sink); // commit + phase prompt
    assert_eq!(hw.shown(0), Some("Choose phase:"));
    assert_eq!(hw.shown(1), Some("Load tank"));

    // Previous from index 0 lands on the last phase.
    hw.press(Button::Left);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.shown(1), Some("Drain"));

    // Next from the last wraps back to the first.
    hw.press(Button::Right);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.shown(1), Some("Load tank"));
}

#[test]
fn cursor_moves_pause_for_the_debounce_interval() {
    let (mut service, mut hw, mut clock, mut sink) = make_menu();
    let timing = service.config().timing.clone();
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    let after_prompt = clock.now;

    hw.press(Button::Up);
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(clock.now - after_prompt, u64::from(timing.menu_debounce_ms));
}

#[test]
fn select_shows_confirmation_and_advances_stage() {
    let (mut service, mut hw, mut clock, mut sink) = make_menu();
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);

    hw.press(Button::Up); // cursor to Auto
    hw.press(Button::Select);
    run_ticks(2, &mut service, &mut hw, &mut clock, &mut sink);

    assert_eq!(
        service.state(),
        State::Menu(MenuStage::SelectPhase { mode: Mode::Auto })
    );
    assert_eq!(hw.shown(0), Some("Selected:"));
    assert_eq!(hw.shown(1), Some("Auto"));
    assert!(sink.saw(&CycleEvent::ModeSelected(Mode::Auto)));
}

#[test]
fn full_menu_flow_starts_the_chosen_cycle() {
    let (mut service, mut hw, mut clock, mut sink) = make_menu();
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink); // mode prompt

    hw.press(Button::Select); // Manual
    run_ticks(2, &mut service, &mut hw, &mut clock, &mut sink); // commit + phase prompt

    hw.press(Button::Up); // cursor to Aerate
    hw.press(Button::Select);
    run_ticks(2, &mut service, &mut hw, &mut clock, &mut sink); // move + commit

    assert_eq!(
        service.state(),
        State::Running {
            mode: Mode::Manual,
            phase: Phase::Air
        }
    );
    assert!(sink.saw(&CycleEvent::CycleStarted {
        mode: Mode::Manual,
        phase: Phase::Air
    }));

    // Phase entry on the next tick: banner plus the owned pump.
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.shown(0), Some("Manual-Aerate"));
    assert!(hw.pump_on(Pump::Air));
    assert_eq!(hw.pumps_on(), 1);
}

#[test]
fn idle_menu_rewrites_nothing() {
    let (mut service, mut hw, mut clock, mut sink) = make_menu();
    run_ticks(1, &mut service, &mut hw, &mut clock, &mut sink);
    let writes_after_prompt = hw.lines.len();

    // No input: the screen content is unchanged, so no line is rewritten.
    run_ticks(5, &mut service, &mut hw, &mut clock, &mut sink);
    assert_eq!(hw.lines.len(), writes_after_prompt);
}
