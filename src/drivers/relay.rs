//! Active-low pump relay driver.
//!
//! The relay board energises its coil when the control line is driven
//! LOW. That inversion lives entirely here: callers speak logical on/off,
//! and nothing above this module knows which raw level means "on".
//!
//! Generic over `embedded-hal`'s [`OutputPin`] so the same driver runs
//! against board GPIO ([`BoardPin`](crate::drivers::hw_init::BoardPin))
//! and against test fakes.

use embedded_hal::digital::OutputPin;

pub struct Relay<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Take ownership of the control pin and release the relay.
    pub fn new(mut pin: P) -> Self {
        pin.set_high().ok();
        Self { pin, on: false }
    }

    /// Energise (`true`) or release (`false`) the relay. Idempotent.
    pub fn set(&mut self, on: bool) {
        if on {
            self.pin.set_low().ok();
        } else {
            self.pin.set_high().ok();
        }
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
