//! Outbound application events.
//!
//! The [`CycleService`](super::service::CycleService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — the reference build logs to serial.

use crate::fsm::context::PumpCommands;
use crate::fsm::{Mode, Phase, State};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleEvent {
    /// The controller came up (carries the initial state).
    Started(State),

    /// The operator confirmed a mode in the menu.
    ModeSelected(Mode),

    /// Both menu selections are done; the cycle is running.
    CycleStarted { mode: Mode, phase: Phase },

    /// The running cycle moved to the next phase.
    PhaseChanged { from: Phase, to: Phase },

    /// The manual force override was engaged for the current phase.
    ForceEngaged(Phase),

    /// A runtime configuration update was applied.
    ConfigUpdated,

    /// A runtime configuration update failed validation.
    ConfigRejected(&'static str),
}

/// A point-in-time status snapshot suitable for logging or an operator
/// surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleStatus {
    pub state: State,
    /// Manual force override currently engaged.
    pub force: bool,
    /// Last level reading, if any.
    pub level_cm: Option<f32>,
    /// Seconds since the current phase was entered (0 in the menu).
    pub elapsed_secs: u32,
    /// Current pump command flags.
    pub pumps: PumpCommands,
}
