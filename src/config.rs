//! System configuration parameters
//!
//! All tunable parameters for the TankCycle controller. The reference
//! hardware compiled these in; here they are plain data so an operator
//! surface can adjust them at runtime via `CycleCommand::UpdateConfig`.

use serde::{Deserialize, Serialize};

/// Core cycle configuration.
///
/// Level thresholds are ultrasonic distances from the sensor to the liquid
/// surface, so "full" is the *smaller* number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    // --- Level thresholds (sonar distance, cm) ---
    /// Surface distance at or below which the tank counts as full
    /// (stop condition for the Load phase in Auto mode).
    pub level_full_cm: f32,
    /// Surface distance at or above which the tank counts as empty
    /// (stop condition for the Unload phase in Auto mode).
    pub level_empty_cm: f32,

    // --- Phase durations (seconds) ---
    /// Aeration run time (Air phase, Auto mode).
    pub air_secs: u32,
    /// Rest time with all pumps off (Wait phase, Auto mode).
    pub rest_secs: u32,

    // --- Sonar ---
    /// Readings beyond this distance are discarded as invalid.
    pub max_range_cm: f32,

    // --- Pauses ---
    pub timing: TimingConfig,
}

/// Durations for every cooperative-loop pause, in milliseconds.
///
/// Each variant of [`Pause`](crate::fsm::Pause) maps to one field here; the
/// runner performs the actual sleep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pause after a normal phase step.
    pub tick_ms: u32,
    /// Pause between menu polls when no button is pressed.
    pub poll_ms: u32,
    /// Pause after a menu cursor move.
    pub menu_debounce_ms: u32,
    /// Pause while the menu confirmation screen is shown.
    pub confirm_ms: u32,
    /// Pause while the phase-advance notice is shown.
    pub notify_ms: u32,
    /// Pause after a phase entry changes actuator state.
    pub settle_ms: u32,
    /// Hold time between the two Select presses of the force sequence.
    pub force_hold_ms: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            // Levels
            level_full_cm: 10.0,
            level_empty_cm: 30.0,

            // Durations
            air_secs: 20,
            rest_secs: 20,

            // Sonar
            max_range_cm: 200.0,

            timing: TimingConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            poll_ms: 50,
            menu_debounce_ms: 300,
            confirm_ms: 1000,
            notify_ms: 1000,
            settle_ms: 500,
            force_hold_ms: 2000,
        }
    }
}

impl CycleConfig {
    /// Range-check every field. Invalid configs are rejected, not clamped,
    /// so a bad runtime update can never disable a stop condition.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.level_full_cm <= 0.0 {
            return Err("level_full_cm must be positive");
        }
        if self.level_empty_cm <= self.level_full_cm {
            return Err("level_empty_cm must exceed level_full_cm");
        }
        if self.max_range_cm < self.level_empty_cm {
            return Err("max_range_cm must cover level_empty_cm");
        }
        if self.air_secs == 0 || self.rest_secs == 0 {
            return Err("phase durations must be non-zero");
        }
        let t = &self.timing;
        if t.tick_ms == 0 || t.settle_ms == 0 {
            return Err("tick_ms and settle_ms must be non-zero");
        }
        if t.force_hold_ms == 0 {
            return Err("force_hold_ms must be non-zero");
        }
        Ok(())
    }
}
