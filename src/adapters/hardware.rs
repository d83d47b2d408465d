//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the keypad, sonar, the three pump relays, and the LCD, exposing
//! them through [`InputPort`], [`LevelPort`], [`ActuatorPort`] and
//! [`DisplayPort`]. This is the only module in the system that wires
//! drivers to the domain. On non-espidf targets the underlying drivers
//! use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, DisplayPort, InputPort, LevelPort};
use crate::drivers::hw_init::BoardPin;
use crate::drivers::keypad::Keypad;
use crate::drivers::lcd::Lcd;
use crate::drivers::relay::Relay;
use crate::drivers::sonar::Sonar;
use crate::fsm::context::{Button, Pump};
use crate::pins;

/// Concrete adapter that combines all board hardware behind port traits.
pub struct HardwareAdapter {
    keypad: Keypad,
    sonar: Sonar,
    lcd: Lcd,
    load_relay: Relay<BoardPin>,
    air_relay: Relay<BoardPin>,
    drain_relay: Relay<BoardPin>,
    /// Sonar readings past this distance are discarded as invalid.
    max_range_cm: f32,
}

impl HardwareAdapter {
    /// Construct from the pin map. Relays come up released.
    pub fn new(max_range_cm: f32) -> Self {
        Self {
            keypad: Keypad::new(),
            sonar: Sonar::new(),
            lcd: Lcd::new(),
            load_relay: Relay::new(BoardPin::new(pins::LOAD_PUMP_RELAY_GPIO)),
            air_relay: Relay::new(BoardPin::new(pins::AIR_PUMP_RELAY_GPIO)),
            drain_relay: Relay::new(BoardPin::new(pins::DRAIN_PUMP_RELAY_GPIO)),
            max_range_cm,
        }
    }

    /// Bring the LCD into 4-bit mode. Call once after peripheral init.
    pub fn init_display(&mut self) {
        self.lcd.init();
    }

    fn relay(&mut self, pump: Pump) -> &mut Relay<BoardPin> {
        match pump {
            Pump::Load => &mut self.load_relay,
            Pump::Air => &mut self.air_relay,
            Pump::Drain => &mut self.drain_relay,
        }
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for HardwareAdapter {
    fn read_button(&mut self) -> Button {
        self.keypad.read()
    }
}

// ── LevelPort implementation ──────────────────────────────────

impl LevelPort for HardwareAdapter {
    fn read_level_cm(&mut self) -> Option<f32> {
        self.sonar.read_cm(self.max_range_cm)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_pump(&mut self, pump: Pump, on: bool) {
        self.relay(pump).set(on);
    }

    fn all_pumps_off(&mut self) {
        for pump in Pump::ALL {
            self.relay(pump).set(false);
        }
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl DisplayPort for HardwareAdapter {
    fn write_line(&mut self, row: u8, text: &str) {
        self.lcd.write_line(row, text);
    }
}
