//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CycleService (domain)
//! ```
//!
//! Driven adapters (keypad, sonar, relays, display, clock, event sinks)
//! implement these traits. The [`CycleService`](super::service::CycleService)
//! consumes them via generics, so the domain core never touches hardware
//! directly — and every electrical convention (active-low relays, ADC
//! ladders, echo timing) stays on the adapter side of this line.

use crate::fsm::context::{Button, Pump};

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: keypad → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the operator keypad.
pub trait InputPort {
    /// Classify the current keypad state into one discrete symbol.
    /// Unrecognised or absent presses read as [`Button::None`].
    /// No debouncing — the state machine paces its own reads.
    fn read_button(&mut self) -> Button;
}

// ───────────────────────────────────────────────────────────────
// Level port (driven adapter: ultrasonic sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the liquid-level probe.
pub trait LevelPort {
    /// Distance from the sensor to the liquid surface in centimetres.
    /// `None` when ranging failed (no echo, out of range). Callers must
    /// treat `None` as "stop condition not met", never as a level.
    fn read_level_cm(&mut self) -> Option<f32>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → pump relays)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the three pump relays. No error surface: pump
/// identity is a closed enum and a relay write cannot meaningfully fail
/// upward — adapters log and carry on.
pub trait ActuatorPort {
    /// Energise (`true`) or release (`false`) one pump.
    fn set_pump(&mut self, pump: Pump, on: bool);

    /// Release every pump — safe shutdown.
    fn all_pumps_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → character LCD)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the two-line status display.
pub trait DisplayPort {
    /// Replace row `row` (0 or 1) with `text`, blank-padding to the full
    /// line width so no stale characters survive. Text beyond the width
    /// is truncated; a wider display may simply pad further.
    fn write_line(&mut self, row: u8, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: monotonic time → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source and the cooperative loop's only sleep primitive.
pub trait ClockPort {
    /// Milliseconds since boot. Monotonic, never decreasing.
    fn now_ms(&mut self) -> u64;

    /// Block the (single-threaded) loop for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`CycleEvent`](super::events::CycleEvent)s
/// through this port. Adapters decide where they go (serial log in the
/// reference build; anything else behind the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::CycleEvent);
}
