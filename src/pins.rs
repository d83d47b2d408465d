//! GPIO / peripheral pin assignments for the TankCycle main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Pump relays (active-low relay board)
// ---------------------------------------------------------------------------

/// Digital output: load pump relay coil. LOW = pump energised.
pub const LOAD_PUMP_RELAY_GPIO: i32 = 1;
/// Digital output: drain pump relay coil. LOW = pump energised.
pub const DRAIN_PUMP_RELAY_GPIO: i32 = 2;
/// Digital output: air pump relay coil. LOW = pump energised.
pub const AIR_PUMP_RELAY_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Ultrasonic level sensor (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs trigger pulse starts a ranging cycle.
pub const SONAR_TRIG_GPIO: i32 = 4;
/// Digital input: echo pulse width encodes the round-trip time.
pub const SONAR_ECHO_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Keypad — single analog ladder (ADC1)
// ---------------------------------------------------------------------------

/// Resistor-ladder keypad on ADC1 channel 4 (GPIO 5 on ESP32-S3).
/// Five buttons pull the line to distinct voltages; see `drivers::keypad`.
pub const KEYPAD_ADC_GPIO: i32 = 5;
/// ADC1 channel for the keypad ladder.
pub const KEYPAD_ADC_CHANNEL: u32 = 4;

// ---------------------------------------------------------------------------
// Character LCD (HD44780, 4-bit bus)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 7;
pub const LCD_EN_GPIO: i32 = 15;
pub const LCD_D4_GPIO: i32 = 16;
pub const LCD_D5_GPIO: i32 = 17;
pub const LCD_D6_GPIO: i32 = 18;
pub const LCD_D7_GPIO: i32 = 21;
