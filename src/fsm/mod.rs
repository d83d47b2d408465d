//! Cycle state machine engine.
//!
//! ```text
//!            Menu(SelectMode) ──confirm──▶ Menu(SelectPhase)
//!                                               │ confirm
//!                                               ▼
//!          ┌── Running(Load) ──▶ Running(Air) ──▶ Running(Wait) ──┐
//!          │                                                      │
//!          └───────────── Running(Unload) ◀───────────────────────┘
//! ```
//!
//! The whole system is one tagged [`State`]: the pre-cycle menu stages and
//! the four running phases. A phase or stage can only exist together with
//! the data it needs (`Running` carries both mode and phase), so "mode not
//! yet chosen" is unrepresentable outside the menu.
//!
//! Each step the engine dispatches on the current state. Handlers are pure
//! with respect to time and hardware: they read the input snapshot, mutate
//! [`CycleContext`], and return a [`Decision`] — optional next state, the
//! pause to take, and an optional transient notice. Entering a state runs
//! as its own step, exactly like the per-phase setup pass of the original
//! controller loop.

pub mod context;
pub mod states;

use context::{CycleContext, Line, Pump};
use log::info;

use crate::config::TimingConfig;

// ---------------------------------------------------------------------------
// Mode / Phase identity
// ---------------------------------------------------------------------------

/// Who decides when a phase is over: thresholds and timers, or the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Manual,
    Auto,
}

impl Mode {
    /// Menu candidate order.
    pub const ALL: [Mode; 2] = [Mode::Manual, Mode::Auto];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Manual => "Manual",
            Mode::Auto => "Auto",
        }
    }
}

/// The four phases of one tank cycle, in fixed successor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Load,
    Air,
    Wait,
    Unload,
}

impl Phase {
    /// Menu candidate order (also the cycle order).
    pub const ALL: [Phase; 4] = [Phase::Load, Phase::Air, Phase::Wait, Phase::Unload];

    /// The next phase in the cycle. Cyclic — Unload wraps to Load.
    pub fn successor(self) -> Phase {
        match self {
            Phase::Load => Phase::Air,
            Phase::Air => Phase::Wait,
            Phase::Wait => Phase::Unload,
            Phase::Unload => Phase::Load,
        }
    }

    /// The pump this phase drives. Wait drives none.
    pub fn pump(self) -> Option<Pump> {
        match self {
            Phase::Load => Some(Pump::Load),
            Phase::Air => Some(Pump::Air),
            Phase::Wait => None,
            Phase::Unload => Some(Pump::Drain),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Load => "Load tank",
            Phase::Air => "Aerate",
            Phase::Wait => "Rest",
            Phase::Unload => "Drain",
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level state
// ---------------------------------------------------------------------------

/// Pre-cycle selection stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuStage {
    /// Choosing Manual vs Auto.
    SelectMode,
    /// Mode is fixed; choosing the starting phase.
    SelectPhase { mode: Mode },
}

/// The complete system state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Pre-cycle configuration menu. This is also the boot state.
    Menu(MenuStage),
    /// A cycle is running. Mode and phase are always present here.
    Running { mode: Mode, phase: Phase },
}

impl State {
    /// Short name for transition logs.
    pub fn describe(&self) -> &'static str {
        match self {
            State::Menu(MenuStage::SelectMode) => "menu:mode",
            State::Menu(MenuStage::SelectPhase { .. }) => "menu:phase",
            State::Running { phase, .. } => phase.label(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, State::Running { .. })
    }
}

// ---------------------------------------------------------------------------
// Step results
// ---------------------------------------------------------------------------

/// The pause a step requests before the next step runs. The runner maps
/// each variant to its configured duration and performs the sleep — state
/// handlers never block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Idle menu poll.
    Poll,
    /// Normal phase cadence.
    Tick,
    /// After a menu cursor move.
    Debounce,
    /// While a selection confirmation is shown.
    Confirm,
    /// While a phase-advance notice is shown.
    Notify,
    /// After phase entry changed actuator state.
    Settle,
    /// Between the two Select presses of the force sequence.
    ForceHold,
}

impl Pause {
    pub fn millis(self, t: &TimingConfig) -> u32 {
        match self {
            Pause::Poll => t.poll_ms,
            Pause::Tick => t.tick_ms,
            Pause::Debounce => t.menu_debounce_ms,
            Pause::Confirm => t.confirm_ms,
            Pause::Notify => t.notify_ms,
            Pause::Settle => t.settle_ms,
            Pause::ForceHold => t.force_hold_ms,
        }
    }
}

/// A transient operator-visible message, shown for the step's pause and
/// replaced by the regular screen on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// When set, the whole display is taken over (both lines rewritten).
    pub line0: Option<Line>,
    pub line1: Line,
}

impl Notice {
    /// Notice on the bottom line only; the banner stays.
    pub fn bottom(args: core::fmt::Arguments<'_>) -> Self {
        Self {
            line0: None,
            line1: context::line(args),
        }
    }

    /// Full-screen notice.
    pub fn full(line0: core::fmt::Arguments<'_>, line1: core::fmt::Arguments<'_>) -> Self {
        Self {
            line0: Some(context::line(line0)),
            line1: context::line(line1),
        }
    }
}

/// What a single engine step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub pause: Pause,
    pub notice: Option<Notice>,
}

/// A state handler's verdict: stay or move, how long to pause, what to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub next: Option<State>,
    pub pause: Pause,
    pub notice: Option<Notice>,
}

impl Decision {
    /// Remain in the current state.
    pub fn stay(pause: Pause) -> Self {
        Self {
            next: None,
            pause,
            notice: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The state machine engine.
///
/// Transitions are two-stage: the step that decides a transition only
/// records it, and the following step runs the new state's entry action
/// (banner, actuator reset, timing capture). This mirrors the reference
/// controller, where each phase's setup ran as a discrete loop pass, and
/// gives the runner a natural point to show the transition notice.
pub struct Machine {
    state: State,
    pending_entry: bool,
}

impl Machine {
    /// A fresh machine, about to enter the mode-selection menu.
    pub fn new() -> Self {
        Self {
            state: State::Menu(MenuStage::SelectMode),
            pending_entry: true,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Advance by one step: run the pending entry action, or dispatch the
    /// current state's update handler and latch any transition it decides.
    pub fn step(&mut self, ctx: &mut CycleContext) -> Step {
        if self.pending_entry {
            self.pending_entry = false;
            return states::enter(self.state, ctx);
        }

        let decision = states::update(self.state, ctx);
        if let Some(next) = decision.next {
            info!("cycle: {} -> {}", self.state.describe(), next.describe());
            self.state = next;
            self.pending_entry = true;
        }
        Step {
            pause: decision.pause,
            notice: decision.notice,
        }
    }

    /// Jump straight to `next`; its entry action runs on the following
    /// step. Used by external commands and bring-up, never by handlers.
    pub fn force_state(&mut self, next: State) {
        info!(
            "cycle: forced {} -> {}",
            self.state.describe(),
            next.describe()
        );
        self.state = next;
        self.pending_entry = true;
    }
}
