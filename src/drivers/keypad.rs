//! Analog resistor-ladder keypad driver.
//!
//! Five buttons share one ADC line; each pulls it to a distinct voltage.
//! Classification partitions the 10-bit sample into six contiguous ranges:
//!
//! | Sample        | Button |
//! |---------------|--------|
//! | > 1000        | None   |
//! | < 50          | Right  |
//! | < 195         | Up     |
//! | < 380         | Down   |
//! | < 555         | Left   |
//! | < 790         | Select |
//! | 790..=1000    | None (gap) |
//!
//! A sample in the gap or above the no-press floor collapses to
//! [`Button::None`] — noise never reads as a press. No debouncing here;
//! the state machine paces its own reads.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the keypad ADC channel via hw_init (12-bit, scaled
//! down to the 10-bit ladder table). On host/test: reads from a static
//! `AtomicU16` for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::fsm::context::Button;

/// Idle sample on the ladder (line pulled to the rail, 10-bit scale).
pub const NO_PRESS_RAW: u16 = 1023;

static SIM_KEYPAD_ADC: AtomicU16 = AtomicU16::new(NO_PRESS_RAW);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_keypad_adc(raw: u16) {
    SIM_KEYPAD_ADC.store(raw, Ordering::Relaxed);
}

/// Classify one ladder sample into a button symbol.
pub fn classify(raw: u16) -> Button {
    if raw > 1000 {
        return Button::None;
    }
    if raw < 50 {
        return Button::Right;
    }
    if raw < 195 {
        return Button::Up;
    }
    if raw < 380 {
        return Button::Down;
    }
    if raw < 555 {
        return Button::Left;
    }
    if raw < 790 {
        return Button::Select;
    }
    Button::None
}

pub struct Keypad;

impl Keypad {
    pub fn new() -> Self {
        Self
    }

    /// Sample the ladder once and classify.
    pub fn read(&mut self) -> Button {
        classify(self.read_adc())
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        // 12-bit oneshot reading scaled to the 10-bit ladder table. A read
        // error returns full scale, which classifies as no press.
        crate::drivers::hw_init::adc1_read(crate::pins::KEYPAD_ADC_CHANNEL) >> 2
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_KEYPAD_ADC.load(Ordering::Relaxed)
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}
