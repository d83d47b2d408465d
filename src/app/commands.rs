//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world that the
//! [`CycleService`](super::service::CycleService) interprets and acts
//! upon. The keypad is *not* routed through here — it is a sampled input,
//! part of the per-tick snapshot.

use crate::config::CycleConfig;
use crate::fsm::Phase;

/// Commands that external callers can send into the application core.
#[derive(Debug, Clone)]
pub enum CycleCommand {
    /// Advance the running cycle to the next phase immediately.
    SkipPhase,

    /// Jump the running cycle to a specific phase (bring-up / testing).
    ForcePhase(Phase),

    /// Hot-reload configuration. Rejected if validation fails.
    UpdateConfig(CycleConfig),
}
