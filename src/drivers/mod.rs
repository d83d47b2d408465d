//! Actuator and sensor drivers, hardware initialisation, and peripheral
//! helpers. Everything here is dual-target: real register access on
//! ESP-IDF, in-memory simulation otherwise.

pub mod hw_init;
pub mod keypad;
pub mod lcd;
pub mod relay;
pub mod sonar;
