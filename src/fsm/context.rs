//! Shared mutable context threaded through every state handler.
//!
//! `CycleContext` is the single struct that state handlers read from and
//! write to: the latest input snapshot, pump command outputs, the screen
//! buffer, the menu cursor, force-override flags, phase timing, and the
//! live configuration. Handlers never touch hardware — the service applies
//! `commands` and `screen` to the ports after each step.

use core::fmt;

use crate::config::CycleConfig;

// ---------------------------------------------------------------------------
// Display lines
// ---------------------------------------------------------------------------

/// Character columns per display line (2×16 reference hardware).
pub const LINE_WIDTH: usize = 16;

/// One display line. Fixed capacity, no heap.
pub type Line = heapless::String<LINE_WIDTH>;

/// Adapter that silently drops characters past [`LINE_WIDTH`], so handlers
/// can format freely and never exceed the line budget.
struct Truncating<'a>(&'a mut Line);

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format a display line, truncating at the line width.
pub fn line(args: fmt::Arguments<'_>) -> Line {
    let mut out = Line::new();
    // Truncating::write_str never fails.
    let _ = fmt::Write::write_fmt(&mut Truncating(&mut out), args);
    out
}

/// The `current/target` status readout shown on the bottom line.
pub fn status_line(current: f32, target: f32) -> Line {
    line(format_args!("{current:.1}/{target:.1}"))
}

/// The two-line screen buffer handlers render into.
///
/// Line 0 carries the mode+phase banner (or menu prompt), line 1 the live
/// status or menu candidate. The service writes changed lines to the
/// display port, padded to the full width so stale characters never linger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub line0: Line,
    pub line1: Line,
}

impl Screen {
    pub fn set_line0(&mut self, args: fmt::Arguments<'_>) {
        self.line0 = line(args);
    }

    pub fn set_line1(&mut self, args: fmt::Arguments<'_>) {
        self.line1 = line(args);
    }

    pub fn clear_line1(&mut self) {
        self.line1.clear();
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Discrete keypad symbol. One analog sample classifies to exactly one of
/// these six; anything unrecognised collapses to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Button {
    Right,
    Up,
    Down,
    Left,
    Select,
    #[default]
    None,
}

/// A point-in-time snapshot of every input. Updated before each step.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    /// Keypad symbol read this tick.
    pub button: Button,
    /// Liquid surface distance (cm), `None` when ranging failed.
    /// Only sampled while a cycle is running.
    pub level_cm: Option<f32>,
    /// Monotonic time of this snapshot (ms since boot).
    pub now_ms: u64,
}

// ---------------------------------------------------------------------------
// Pump commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// The three pumps of the apparatus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pump {
    Load,
    Air,
    Drain,
}

impl Pump {
    pub const ALL: [Pump; 3] = [Pump::Load, Pump::Air, Pump::Drain];
}

/// Desired on/off state per pump. Persists across ticks; phase entry
/// resets it before energising the phase's own pump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpCommands {
    pub load: bool,
    pub air: bool,
    pub drain: bool,
}

impl PumpCommands {
    /// All pumps off — safe default.
    pub fn all_off() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pump: Pump, on: bool) {
        match pump {
            Pump::Load => self.load = on,
            Pump::Air => self.air = on,
            Pump::Drain => self.drain = on,
        }
    }

    pub fn get(&self, pump: Pump) -> bool {
        match pump {
            Pump::Load => self.load,
            Pump::Air => self.air,
            Pump::Drain => self.drain,
        }
    }

    /// Number of pumps currently commanded on.
    pub fn active_count(&self) -> usize {
        usize::from(self.load) + usize::from(self.air) + usize::from(self.drain)
    }
}

// ---------------------------------------------------------------------------
// CycleContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler.
pub struct CycleContext {
    /// Latest inputs. Written by the service before each step.
    pub input: InputSnapshot,
    /// Pump commands to apply after the step.
    pub commands: PumpCommands,
    /// Persistent screen contents (banner + status / menu text).
    pub screen: Screen,
    /// Live configuration (runtime-tunable).
    pub config: CycleConfig,

    /// Menu cursor. Meaningful only in menu states; reset on stage entry.
    pub cursor: usize,

    /// Manual-mode force override: keeps the phase's pump energised past
    /// its stop condition. Cleared on every phase entry.
    pub force: bool,
    /// Set after the first Select of the force sequence; the second Select
    /// on the following step engages `force`.
    pub force_arming: bool,

    /// Monotonic time at which the current phase was entered.
    pub phase_entered_ms: u64,
}

impl CycleContext {
    pub fn new(config: CycleConfig) -> Self {
        Self {
            input: InputSnapshot::default(),
            commands: PumpCommands::all_off(),
            screen: Screen::default(),
            config,
            cursor: 0,
            force: false,
            force_arming: false,
            phase_entered_ms: 0,
        }
    }

    /// Whole seconds elapsed since the current phase was entered.
    pub fn elapsed_secs(&self) -> u32 {
        (self.input.now_ms.saturating_sub(self.phase_entered_ms) / 1000) as u32
    }
}
