//! Concrete state handlers: the menu stages and the four cycle phases.
//!
//! Every handler follows the same shape as the reference controller's
//! per-phase loop: read the button, honour the manual skip, honour the
//! force sequence (Load/Air/Unload only), render the `current/target`
//! status, then evaluate the phase's stop condition. Auto mode advances on
//! the stop condition; Manual mode advances only on the skip action, and
//! once the stop condition holds the pump runs only while forced.
//!
//! A failed level reading (no echo, non-positive value) never satisfies a
//! stop condition — a sensor fault must read as "keep going", not as
//! "tank full/empty".

use log::info;

use super::context::{status_line, Button, CycleContext, PumpCommands};
use super::{Decision, MenuStage, Mode, Notice, Pause, Phase, State, Step};

// ═══════════════════════════════════════════════════════════════
//  Entry actions
// ═══════════════════════════════════════════════════════════════

/// Run the entry action for `state`. Executes as its own step.
pub(crate) fn enter(state: State, ctx: &mut CycleContext) -> Step {
    match state {
        State::Menu(MenuStage::SelectMode) => {
            ctx.cursor = 0;
            ctx.screen.set_line0(format_args!("Choose mode:"));
            ctx.screen
                .set_line1(format_args!("{}", Mode::ALL[0].label()));
            Step {
                pause: Pause::Poll,
                notice: None,
            }
        }
        State::Menu(MenuStage::SelectPhase { .. }) => {
            ctx.cursor = 0;
            ctx.screen.set_line0(format_args!("Choose phase:"));
            ctx.screen
                .set_line1(format_args!("{}", Phase::ALL[0].label()));
            Step {
                pause: Pause::Poll,
                notice: None,
            }
        }
        State::Running { mode, phase } => {
            // The override never survives into a new phase.
            ctx.force = false;
            ctx.force_arming = false;

            // All pumps off before the phase's own pump comes on, so a
            // transition can never leave two pumps energised.
            ctx.commands = PumpCommands::all_off();
            if let Some(pump) = phase.pump() {
                ctx.commands.set(pump, true);
            }

            // Captured for every phase; only Air and Wait consume it.
            ctx.phase_entered_ms = ctx.input.now_ms;

            ctx.screen
                .set_line0(format_args!("{}-{}", mode.label(), phase.label()));
            ctx.screen.clear_line1();

            info!("phase {} entered ({} mode)", phase.label(), mode.label());
            Step {
                pause: Pause::Settle,
                notice: None,
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Update dispatch
// ═══════════════════════════════════════════════════════════════

/// Dispatch one update step for the current state.
pub(crate) fn update(state: State, ctx: &mut CycleContext) -> Decision {
    match state {
        State::Menu(stage) => menu_update(stage, ctx),
        State::Running { mode, phase } => match phase {
            Phase::Load => load_update(mode, ctx),
            Phase::Air => air_update(mode, ctx),
            Phase::Wait => wait_update(mode, ctx),
            Phase::Unload => unload_update(mode, ctx),
        },
    }
}

// ═══════════════════════════════════════════════════════════════
//  Menu stages
// ═══════════════════════════════════════════════════════════════

/// One generic cursor menu serves both stages; only the candidate list and
/// the committed state differ.
fn menu_update(stage: MenuStage, ctx: &mut CycleContext) -> Decision {
    let button = ctx.input.button;
    if button == Button::None {
        return Decision::stay(Pause::Poll);
    }

    let count = match stage {
        MenuStage::SelectMode => Mode::ALL.len(),
        MenuStage::SelectPhase { .. } => Phase::ALL.len(),
    };
    let label = |cursor: usize| match stage {
        MenuStage::SelectMode => Mode::ALL[cursor].label(),
        MenuStage::SelectPhase { .. } => Phase::ALL[cursor].label(),
    };

    match button {
        Button::Up | Button::Right => {
            ctx.cursor = (ctx.cursor + 1) % count;
            ctx.screen.set_line1(format_args!("{}", label(ctx.cursor)));
            Decision::stay(Pause::Debounce)
        }
        Button::Down | Button::Left => {
            ctx.cursor = (ctx.cursor + count - 1) % count;
            ctx.screen.set_line1(format_args!("{}", label(ctx.cursor)));
            Decision::stay(Pause::Debounce)
        }
        Button::Select => {
            let next = match stage {
                MenuStage::SelectMode => {
                    let mode = Mode::ALL[ctx.cursor];
                    info!("mode selected: {}", mode.label());
                    State::Menu(MenuStage::SelectPhase { mode })
                }
                MenuStage::SelectPhase { mode } => {
                    let phase = Phase::ALL[ctx.cursor];
                    info!("starting phase selected: {}", phase.label());
                    State::Running { mode, phase }
                }
            };
            Decision {
                next: Some(next),
                pause: Pause::Confirm,
                notice: Some(Notice::full(
                    format_args!("Selected:"),
                    format_args!("{}", label(ctx.cursor)),
                )),
            }
        }
        Button::None => Decision::stay(Pause::Poll),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Phase handlers
// ═══════════════════════════════════════════════════════════════

fn load_update(mode: Mode, ctx: &mut CycleContext) -> Decision {
    let button = ctx.input.button;
    if let Some(d) = manual_skip(mode, Phase::Load, button) {
        return d;
    }
    if let Some(d) = force_check(mode, button, ctx) {
        return d;
    }

    let reading = ctx.input.level_cm;
    let target = auto_target(mode, ctx.config.level_full_cm);
    ctx.screen.line1 = status_line(reading.unwrap_or(0.0), target);

    if tank_full(reading, ctx.config.level_full_cm) {
        match mode {
            Mode::Auto => {
                ctx.commands.load = false;
                return advance(mode, Phase::Load);
            }
            Mode::Manual => ctx.commands.load = ctx.force,
        }
    }
    Decision::stay(Pause::Tick)
}

fn air_update(mode: Mode, ctx: &mut CycleContext) -> Decision {
    let button = ctx.input.button;
    if let Some(d) = manual_skip(mode, Phase::Air, button) {
        return d;
    }
    if let Some(d) = force_check(mode, button, ctx) {
        return d;
    }

    let elapsed = ctx.elapsed_secs();
    let target = auto_target(mode, ctx.config.air_secs as f32);
    ctx.screen.line1 = status_line(elapsed as f32, target);

    if elapsed >= ctx.config.air_secs {
        match mode {
            Mode::Auto => {
                ctx.commands.air = false;
                return advance(mode, Phase::Air);
            }
            Mode::Manual => ctx.commands.air = ctx.force,
        }
    }
    Decision::stay(Pause::Tick)
}

fn wait_update(mode: Mode, ctx: &mut CycleContext) -> Decision {
    let button = ctx.input.button;
    if let Some(d) = manual_skip(mode, Phase::Wait, button) {
        return d;
    }
    // No pump to force here.

    let elapsed = ctx.elapsed_secs();
    let target = auto_target(mode, ctx.config.rest_secs as f32);
    ctx.screen.line1 = status_line(elapsed as f32, target);

    if elapsed >= ctx.config.rest_secs && mode == Mode::Auto {
        return advance(mode, Phase::Wait);
    }
    Decision::stay(Pause::Tick)
}

fn unload_update(mode: Mode, ctx: &mut CycleContext) -> Decision {
    let button = ctx.input.button;
    if let Some(d) = manual_skip(mode, Phase::Unload, button) {
        return d;
    }
    if let Some(d) = force_check(mode, button, ctx) {
        return d;
    }

    let reading = ctx.input.level_cm;
    let target = auto_target(mode, ctx.config.level_empty_cm);
    ctx.screen.line1 = status_line(reading.unwrap_or(0.0), target);

    if tank_empty(reading, ctx.config.level_empty_cm) {
        match mode {
            Mode::Auto => {
                ctx.commands.drain = false;
                return advance(mode, Phase::Unload);
            }
            Mode::Manual => ctx.commands.drain = ctx.force,
        }
    }
    Decision::stay(Pause::Tick)
}

// ═══════════════════════════════════════════════════════════════
//  Shared checks
// ═══════════════════════════════════════════════════════════════

/// Manual-mode skip: Right advances to the successor immediately,
/// bypassing all threshold logic. Checked first in every phase.
fn manual_skip(mode: Mode, phase: Phase, button: Button) -> Option<Decision> {
    (mode == Mode::Manual && button == Button::Right).then(|| advance(mode, phase))
}

/// Manual-mode force sequence: Select arms the override and requests the
/// confirmation-hold pause; a second Select on the following step engages
/// `force` for the remainder of the phase.
fn force_check(mode: Mode, button: Button, ctx: &mut CycleContext) -> Option<Decision> {
    if mode != Mode::Manual {
        return None;
    }
    if ctx.force_arming {
        ctx.force_arming = false;
        if button == Button::Select {
            ctx.force = true;
            info!("force override engaged");
        }
        // Either way the step continues normally.
        return None;
    }
    if button == Button::Select && !ctx.force {
        ctx.force_arming = true;
        return Some(Decision::stay(Pause::ForceHold));
    }
    None
}

/// Transition to the phase's successor with the operator-visible notice.
fn advance(mode: Mode, from: Phase) -> Decision {
    Decision {
        next: Some(State::Running {
            mode,
            phase: from.successor(),
        }),
        pause: Pause::Notify,
        notice: Some(Notice::bottom(format_args!("Next phase..."))),
    }
}

/// The reference value shown next to the live measurement. In Manual mode
/// the operator decides, so the target reads 0.
fn auto_target(mode: Mode, target: f32) -> f32 {
    match mode {
        Mode::Auto => target,
        Mode::Manual => 0.0,
    }
}

/// Surface has risen to (or past) the full mark. A missing or non-positive
/// reading is a sensor fault and never counts as full.
fn tank_full(reading: Option<f32>, full_cm: f32) -> bool {
    matches!(reading, Some(d) if d > 0.0 && d <= full_cm)
}

/// Surface has dropped to (or past) the empty mark. Same fail-safe rule.
fn tank_empty(reading: Option<f32>, empty_cm: f32) -> bool {
    matches!(reading, Some(d) if d > 0.0 && d >= empty_cm)
}
