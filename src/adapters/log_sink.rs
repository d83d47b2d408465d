//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured cycle events to the
//! logger (UART / USB-CDC in the firmware build). A future telemetry
//! adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::CycleEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`CycleEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &CycleEvent) {
        match event {
            CycleEvent::Started(state) => {
                info!("START | initial={}", state.describe());
            }
            CycleEvent::ModeSelected(mode) => {
                info!("MENU  | mode={}", mode.label());
            }
            CycleEvent::CycleStarted { mode, phase } => {
                info!("CYCLE | {} mode, starting at {}", mode.label(), phase.label());
            }
            CycleEvent::PhaseChanged { from, to } => {
                info!("PHASE | {} -> {}", from.label(), to.label());
            }
            CycleEvent::ForceEngaged(phase) => {
                info!("FORCE | engaged during {}", phase.label());
            }
            CycleEvent::ConfigUpdated => {
                info!("CONF  | runtime update applied");
            }
            CycleEvent::ConfigRejected(reason) => {
                warn!("CONF  | update rejected: {}", reason);
            }
        }
    }
}
