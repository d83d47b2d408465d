//! HC-SR04 ultrasonic level sensor driver.
//!
//! A 10 µs trigger pulse starts a ranging cycle; the echo pin goes high
//! for the sound's round-trip time. Conversion uses the standard 57 µs/cm
//! round-trip constant. A missing echo or a reading past the configured
//! ceiling returns `None` — callers treat that as "stop condition not
//! met", never as a level.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the trigger and times the echo via hw_init.
//! On host/test: reads the round-trip time from a static `AtomicU32`
//! for injection (0 = no echo).

use core::sync::atomic::{AtomicU32, Ordering};

/// Round-trip microseconds of sound per centimetre of distance.
pub const US_PER_CM: f32 = 57.0;

static SIM_ECHO_US: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(round_trip_us: u32) {
    SIM_ECHO_US.store(round_trip_us, Ordering::Relaxed);
}

/// Convert a round-trip echo time to centimetres. Zero (no echo) and
/// readings past `max_range_cm` are discarded.
pub fn echo_to_cm(round_trip_us: u32, max_range_cm: f32) -> Option<f32> {
    if round_trip_us == 0 {
        return None;
    }
    let cm = round_trip_us as f32 / US_PER_CM;
    (cm <= max_range_cm).then_some(cm)
}

pub struct Sonar;

impl Sonar {
    pub fn new() -> Self {
        Self
    }

    /// One ranging cycle. `None` on no echo or out-of-range.
    pub fn read_cm(&mut self, max_range_cm: f32) -> Option<f32> {
        echo_to_cm(self.ping_us(max_range_cm), max_range_cm)
    }

    #[cfg(target_os = "espidf")]
    fn ping_us(&self, max_range_cm: f32) -> u32 {
        use crate::drivers::hw_init;
        use crate::pins;

        // 10 µs trigger pulse, preceded by a short settle-low.
        hw_init::gpio_write(pins::SONAR_TRIG_GPIO, false);
        hw_init::delay_us(4);
        hw_init::gpio_write(pins::SONAR_TRIG_GPIO, true);
        hw_init::delay_us(10);
        hw_init::gpio_write(pins::SONAR_TRIG_GPIO, false);

        // Wait for the echo pulse to start. The sensor holds off up to
        // a few hundred microseconds; 10 ms covers a stuck line.
        let wait_start = hw_init::now_us();
        while !hw_init::gpio_read(pins::SONAR_ECHO_GPIO) {
            if hw_init::now_us().saturating_sub(wait_start) > 10_000 {
                return 0;
            }
        }

        // Time the pulse width, bounded by the configured ceiling.
        let rise = hw_init::now_us();
        let ceiling_us = (max_range_cm * US_PER_CM) as u64 + 200;
        while hw_init::gpio_read(pins::SONAR_ECHO_GPIO) {
            if hw_init::now_us().saturating_sub(rise) > ceiling_us {
                return 0;
            }
        }
        (hw_init::now_us().saturating_sub(rise)) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    fn ping_us(&self, _max_range_cm: f32) -> u32 {
        SIM_ECHO_US.load(Ordering::Relaxed)
    }
}

impl Default for Sonar {
    fn default() -> Self {
        Self::new()
    }
}
