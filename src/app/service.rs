//! Application service — the hexagonal core.
//!
//! [`CycleService`] owns the state machine and shared context. It exposes
//! a clean, hardware-agnostic API. All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!   InputPort ──▶ ┌────────────────────────┐ ──▶ ActuatorPort
//!                 │      CycleService       │ ──▶ DisplayPort
//!   LevelPort ──▶ │   Machine · Context     │ ──▶ EventSink
//!                 └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::CycleConfig;
use crate::fsm::context::{CycleContext, Line, Pump};
use crate::fsm::{Machine, MenuStage, Mode, Notice, Pause, Phase, State, Step};

use super::commands::CycleCommand;
use super::events::{CycleEvent, CycleStatus};
use super::ports::{ActuatorPort, ClockPort, DisplayPort, EventSink, InputPort, LevelPort};

// ───────────────────────────────────────────────────────────────
// CycleService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct CycleService {
    machine: Machine,
    ctx: CycleContext,
    tick_count: u64,
    /// What is currently on the physical display, one entry per row.
    /// Lines are rewritten only when they change.
    shown: [Line; 2],
}

impl CycleService {
    /// Construct the service from configuration.
    ///
    /// Does **not** run anything — call [`start`](Self::start) (or
    /// [`start_from`](Self::start_from)) and then tick.
    pub fn new(config: CycleConfig) -> Self {
        Self {
            machine: Machine::new(),
            ctx: CycleContext::new(config),
            tick_count: 0,
            shown: [Line::new(), Line::new()],
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the controller up in the mode-selection menu with every pump
    /// released.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_pumps_off();
        sink.emit(&CycleEvent::Started(self.machine.state()));
        info!("controller started in {}", self.machine.state().describe());
    }

    /// Bring the controller up already running `phase` in `mode`,
    /// bypassing the menu. Bring-up and test entry point.
    pub fn start_from(
        &mut self,
        mode: Mode,
        phase: Phase,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        hw.all_pumps_off();
        self.machine
            .force_state(State::Running { mode, phase });
        sink.emit(&CycleEvent::Started(self.machine.state()));
        info!(
            "controller started at phase {} ({} mode)",
            phase.label(),
            mode.label()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control tick: sample inputs → step the machine →
    /// apply pumps → render the display → emit events. Returns the pause
    /// the step requested; the runner performs the sleep.
    ///
    /// The `hw` parameter satisfies all four hardware ports — one adapter
    /// owns the board, which avoids double mutable borrows while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl InputPort + LevelPort + ActuatorPort + DisplayPort),
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Pause {
        self.tick_count += 1;
        let prev_state = self.machine.state();
        let prev_force = self.ctx.force;

        // 1. Sample inputs. The sonar is only ranged while a cycle runs.
        self.ctx.input.now_ms = clock.now_ms();
        self.ctx.input.button = hw.read_button();
        self.ctx.input.level_cm = if prev_state.is_running() {
            hw.read_level_cm()
        } else {
            None
        };

        // 2. One machine step (pure state logic).
        let step = self.machine.step(&mut self.ctx);

        // 3. Apply commands, render, emit.
        self.settle(prev_state, prev_force, &step, hw, sink);

        step.pause
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command. Forced transitions run their entry
    /// action immediately so pump state never lags a command.
    pub fn handle_command(
        &mut self,
        cmd: CycleCommand,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        match cmd {
            CycleCommand::SkipPhase => match self.machine.state() {
                State::Running { mode, phase } => {
                    self.force_run(
                        State::Running {
                            mode,
                            phase: phase.successor(),
                        },
                        hw,
                        sink,
                    );
                }
                State::Menu(_) => warn!("SkipPhase ignored: no cycle running"),
            },
            CycleCommand::ForcePhase(phase) => match self.machine.state() {
                State::Running { mode, .. } => {
                    self.force_run(State::Running { mode, phase }, hw, sink);
                }
                State::Menu(_) => warn!("ForcePhase ignored: mode not chosen yet"),
            },
            CycleCommand::UpdateConfig(config) => match config.validate() {
                Ok(()) => {
                    self.ctx.config = config;
                    info!("configuration updated at runtime");
                    sink.emit(&CycleEvent::ConfigUpdated);
                }
                Err(reason) => {
                    warn!("config update rejected: {reason}");
                    sink.emit(&CycleEvent::ConfigRejected(reason));
                }
            },
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current top-level state.
    pub fn state(&self) -> State {
        self.machine.state()
    }

    /// Build a status snapshot from the current context.
    pub fn status(&self) -> CycleStatus {
        CycleStatus {
            state: self.machine.state(),
            force: self.ctx.force,
            level_cm: self.ctx.input.level_cm,
            elapsed_secs: if self.machine.state().is_running() {
                self.ctx.elapsed_secs()
            } else {
                0
            },
            pumps: self.ctx.commands,
        }
    }

    /// The live configuration.
    pub fn config(&self) -> &CycleConfig {
        &self.ctx.config
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Jump to `next` and run its entry step right away, so actuators and
    /// display reflect the command before the next tick.
    fn force_run(
        &mut self,
        next: State,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        let prev_state = self.machine.state();
        let prev_force = self.ctx.force;
        self.machine.force_state(next);
        let step = self.machine.step(&mut self.ctx);
        self.settle(prev_state, prev_force, &step, hw, sink);
    }

    /// Common tail of every step: pumps, display, events.
    fn settle(
        &mut self,
        prev_state: State,
        prev_force: bool,
        step: &Step,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        self.apply_pumps(hw);
        match &step.notice {
            Some(notice) => self.render_notice(hw, notice),
            None => self.render_screen(hw),
        }
        self.emit_changes(prev_state, prev_force, sink);
    }

    /// Translate command flags into port calls, every tick. Relay writes
    /// are idempotent, so re-asserting the current state is harmless.
    fn apply_pumps(&self, hw: &mut impl ActuatorPort) {
        for pump in Pump::ALL {
            hw.set_pump(pump, self.ctx.commands.get(pump));
        }
    }

    /// Write changed screen lines to the display.
    fn render_screen(&mut self, hw: &mut impl DisplayPort) {
        if self.ctx.screen.line0 != self.shown[0] {
            hw.write_line(0, &self.ctx.screen.line0);
            self.shown[0] = self.ctx.screen.line0.clone();
        }
        if self.ctx.screen.line1 != self.shown[1] {
            hw.write_line(1, &self.ctx.screen.line1);
            self.shown[1] = self.ctx.screen.line1.clone();
        }
    }

    /// A notice takes over the display for this step; the regular screen
    /// re-renders on the next one.
    fn render_notice(&mut self, hw: &mut impl DisplayPort, notice: &Notice) {
        if let Some(line0) = &notice.line0 {
            hw.write_line(0, line0);
            self.shown[0] = line0.clone();
        }
        hw.write_line(1, &notice.line1);
        self.shown[1] = notice.line1.clone();
    }

    /// Emit structured events for whatever this step changed.
    fn emit_changes(&self, prev: State, prev_force: bool, sink: &mut impl EventSink) {
        let now = self.machine.state();
        match (prev, now) {
            (State::Menu(MenuStage::SelectMode), State::Menu(MenuStage::SelectPhase { mode })) => {
                sink.emit(&CycleEvent::ModeSelected(mode));
            }
            (State::Menu(MenuStage::SelectPhase { .. }), State::Running { mode, phase }) => {
                sink.emit(&CycleEvent::CycleStarted { mode, phase });
            }
            (State::Running { phase: from, .. }, State::Running { phase: to, .. })
                if from != to =>
            {
                sink.emit(&CycleEvent::PhaseChanged { from, to });
            }
            _ => {}
        }

        if !prev_force && self.ctx.force {
            if let State::Running { phase, .. } = now {
                sink.emit(&CycleEvent::ForceEngaged(phase));
            }
        }
    }
}
