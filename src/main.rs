//! TankCycle Firmware — Main Entry Point
//!
//! Hexagonal composition root for the ESP32-S3 build.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                 │
//! │                                                       │
//! │  HardwareAdapter            SystemClock  LogEventSink │
//! │  (Input+Level+Actuator+Display) (Clock)  (EventSink)  │
//! │                                                       │
//! │  ───────────── Port Trait Boundary ─────────────      │
//! │                                                       │
//! │  ┌─────────────────────────────────────────────┐      │
//! │  │          CycleService (pure logic)          │      │
//! │  │  Menu + Phase state machine                 │      │
//! │  └─────────────────────────────────────────────┘      │
//! │                                                       │
//! │  runner::run_forever (cooperative tick loop)          │
//! └───────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use log::info;

use tankcycle::adapters::hardware::HardwareAdapter;
use tankcycle::adapters::log_sink::LogEventSink;
use tankcycle::adapters::time::SystemClock;
use tankcycle::app::ports::DisplayPort;
use tankcycle::app::service::CycleService;
use tankcycle::config::CycleConfig;
use tankcycle::{drivers, runner};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TankCycle v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    drivers::hw_init::init_peripherals()?;

    let config = CycleConfig::default();
    config
        .validate()
        .map_err(|reason| anyhow::anyhow!("built-in config invalid: {reason}"))?;

    // ── 3. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(config.max_range_cm);
    hw.init_display();
    hw.write_line(0, "Starting...");

    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();

    // ── 4. Application service ────────────────────────────────
    let mut service = CycleService::new(config);
    service.start(&mut hw, &mut sink);

    info!("System ready. Entering control loop.");

    // ── 5. Cooperative loop (never returns) ───────────────────
    runner::run_forever(&mut service, &mut hw, &mut clock, &mut sink)
}
