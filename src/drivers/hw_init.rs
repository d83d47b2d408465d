//! One-shot hardware peripheral initialization and raw pin access.
//!
//! Configures the keypad ADC channel and all GPIO directions using raw
//! ESP-IDF sys calls, and exposes the thin `gpio_*`/`adc1_read`/timing
//! helpers every driver builds on. Called once from `main()` before the
//! control loop starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real register access. On host/test: inert stubs, so every
//! driver above this module compiles and runs in simulation.

use crate::error::Result;

#[cfg(target_os = "espidf")]
use crate::error::Error;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<()> {
    // SAFETY: called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<()> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("ADC1 unit init failed"));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe {
        adc_oneshot_config_channel(ADC1_HANDLE, pins::KEYPAD_ADC_CHANNEL, &chan_cfg)
    };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("keypad ADC channel config failed"));
    }

    info!("hw_init: ADC1 configured (keypad ladder)");
    Ok(())
}

/// Read the keypad ADC channel. Returns **full scale** on a read error so
/// a broken ADC classifies as "no button pressed", never as a press.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() before this is
    // called; single-threaded main-loop access.
    let ret = unsafe { adc_oneshot_read(ADC1_HANDLE, channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 4095;
    }
    raw.clamp(0, 4095) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    4095
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<()> {
    let output_pins = [
        pins::LOAD_PUMP_RELAY_GPIO,
        pins::DRAIN_PUMP_RELAY_GPIO,
        pins::AIR_PUMP_RELAY_GPIO,
        pins::SONAR_TRIG_GPIO,
        pins::LCD_RS_GPIO,
        pins::LCD_EN_GPIO,
        pins::LCD_D4_GPIO,
        pins::LCD_D5_GPIO,
        pins::LCD_D6_GPIO,
        pins::LCD_D7_GPIO,
    ];
    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("GPIO output config failed"));
        }
    }

    let echo_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::SONAR_ECHO_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&echo_cfg) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("sonar echo pin config failed"));
    }

    info!("hw_init: GPIO configured (relays, sonar, LCD bus)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: pin was configured as an output in init_gpio().
    let _ = unsafe { gpio_set_level(pin, u32::from(high)) };
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: pin was configured as an input in init_gpio().
    unsafe { gpio_get_level(pin) != 0 }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

// ── Timing primitives ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn now_us() -> u64 {
    // SAFETY: esp_timer is started by the IDF runtime before main().
    (unsafe { esp_timer_get_time() }) as u64
}

#[cfg(not(target_os = "espidf"))]
pub fn now_us() -> u64 {
    0
}

/// Busy-wait. Only used for sub-millisecond device timing (LCD strobes,
/// sonar trigger pulse) — the control loop sleeps via the clock port.
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    // SAFETY: plain ROM busy-wait, no shared state.
    unsafe { esp_rom_delay_us(us) }
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}

// ── Board pin (embedded-hal adapter) ──────────────────────────

/// A GPIO output pin exposed through the `embedded-hal` [`OutputPin`]
/// trait, so drivers that are generic over pins (the relay driver) work
/// against the board GPIO and against test fakes alike.
///
/// [`OutputPin`]: embedded_hal::digital::OutputPin
pub struct BoardPin {
    gpio: i32,
}

impl BoardPin {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl embedded_hal::digital::ErrorType for BoardPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for BoardPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        gpio_write(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        gpio_write(self.gpio, true);
        Ok(())
    }
}
