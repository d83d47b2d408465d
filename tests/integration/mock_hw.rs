//! Mock hardware adapters for integration tests.
//!
//! Scripted inputs and recorded outputs: tests queue button presses and
//! level readings, then assert on the full pump-call and display-write
//! history without touching real GPIO.

use std::collections::VecDeque;

use tankcycle::app::events::CycleEvent;
use tankcycle::app::ports::{
    ActuatorPort, ClockPort, DisplayPort, EventSink, InputPort, LevelPort,
};
use tankcycle::fsm::context::{Button, Pump};

// ── Pump call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PumpCall {
    Set { pump: Pump, on: bool },
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Scripted button presses, one per tick. Empty reads as no press.
    pub buttons: VecDeque<Button>,
    /// Scripted level readings, one per read. Falls back to `hold_level`
    /// once exhausted.
    pub levels: VecDeque<Option<f32>>,
    pub hold_level: Option<f32>,
    pub pump_calls: Vec<PumpCall>,
    /// Every display write, in order.
    pub lines: Vec<(u8, String)>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            buttons: VecDeque::new(),
            levels: VecDeque::new(),
            hold_level: None,
            pump_calls: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Queue one button press for the next tick.
    pub fn press(&mut self, button: Button) {
        self.buttons.push_back(button);
    }

    /// Queue level readings, consumed one per read.
    pub fn queue_levels(&mut self, readings: &[Option<f32>]) {
        self.levels.extend(readings.iter().copied());
    }

    /// Effective on/off state of one pump after the recorded history.
    pub fn pump_on(&self, pump: Pump) -> bool {
        self.pump_calls
            .iter()
            .rev()
            .find_map(|call| match call {
                PumpCall::Set { pump: p, on } if *p == pump => Some(*on),
                PumpCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// How many pumps are currently on.
    pub fn pumps_on(&self) -> usize {
        Pump::ALL.iter().filter(|&&p| self.pump_on(p)).count()
    }

    /// The text last written to `row`, if any.
    pub fn shown(&self, row: u8) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|(r, _)| *r == row)
            .map(|(_, text)| text.as_str())
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockHardware {
    fn read_button(&mut self) -> Button {
        self.buttons.pop_front().unwrap_or(Button::None)
    }
}

impl LevelPort for MockHardware {
    fn read_level_cm(&mut self) -> Option<f32> {
        self.levels.pop_front().unwrap_or(self.hold_level)
    }
}

impl ActuatorPort for MockHardware {
    fn set_pump(&mut self, pump: Pump, on: bool) {
        self.pump_calls.push(PumpCall::Set { pump, on });
    }

    fn all_pumps_off(&mut self) {
        self.pump_calls.push(PumpCall::AllOff);
    }
}

impl DisplayPort for MockHardware {
    fn write_line(&mut self, row: u8, text: &str) {
        self.lines.push((row, text.to_string()));
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Deterministic clock: sleeping advances time, and tests may jump `now`
/// directly to model long phases without thousands of ticks.
pub struct ManualClock {
    pub now: u64,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self { now: 0 }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&mut self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.now += u64::from(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<CycleEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn saw(&self, event: &CycleEvent) -> bool {
        self.events.contains(event)
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &CycleEvent) {
        self.events.push(event.clone());
    }
}
