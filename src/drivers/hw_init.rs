//! One-shot hardware peripheral initialization.
//!
//! Configures the battery ADC channel, the PIR input, and the LEDC
//! timers/channels for the RGB LED and the buzzer using raw ESP-IDF sys
//! calls.  Called once from `main()` before the superloop starts.
//!
//! The I²C devices (sensor and display) are brought up separately through
//! their driver crates in `main`.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(_: HwInitError) -> Self {
        Self::Init("peripherals")
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the superloop; single-threaded.
    unsafe {
        init_adc()?;
        init_pir_input()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot + line-fitting calibration) ──────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut ADC1_CALI: adc_cali_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
const BATTERY_ATTEN: adc_atten_t = adc_atten_t_ADC_ATTEN_DB_12;

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: BATTERY_ATTEN,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(ADC1_HANDLE, pins::BATTERY_ADC_CHANNEL, &chan_cfg) };
    if ret != ESP_OK { return Err(HwInitError::AdcInitFailed(ret)); }

    let cali_cfg = adc_cali_line_fitting_config_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        atten: BATTERY_ATTEN,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        ..Default::default()
    };
    // SAFETY: ADC1_CALI is only written here, once at boot.
    let ret = unsafe { adc_cali_create_scheme_line_fitting(&cali_cfg, &raw mut ADC1_CALI) };
    if ret != ESP_OK { return Err(HwInitError::AdcInitFailed(ret)); }

    info!("hw_init: ADC1 CH{} configured (battery, 12 dB, line fitting)", pins::BATTERY_ADC_CHANNEL);
    Ok(())
}

/// One calibrated battery-pin conversion in microvolts.  0 on a failed read.
#[cfg(target_os = "espidf")]
pub fn battery_adc_read_uv() -> u32 {
    let mut raw: i32 = 0;
    let mut mv: i32 = 0;
    // SAFETY: handles are written once during init_adc() before this is
    // called; only the main loop reads the ADC.
    unsafe {
        if adc_oneshot_read(ADC1_HANDLE, pins::BATTERY_ADC_CHANNEL, &mut raw) != ESP_OK {
            return 0;
        }
        if adc_cali_raw_to_voltage(ADC1_CALI, raw, &mut mv) != ESP_OK {
            return 0;
        }
    }
    mv.max(0) as u32 * 1000
}

#[cfg(not(target_os = "espidf"))]
pub fn battery_adc_read_uv() -> u32 {
    0
}

// ── GPIO input (PIR) ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_pir_input() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PIR_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
        ..Default::default()
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: PIR input configured (GPIO{})", pins::PIR_GPIO);
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_LED_R: u32 = 0;
pub const LEDC_CH_LED_G: u32 = 1;
pub const LEDC_CH_LED_B: u32 = 2;
pub const LEDC_CH_BUZZER: u32 = 3;

#[cfg(target_os = "espidf")]
const LEDC_TIMER_LED: ledc_timer_t = ledc_timer_t_LEDC_TIMER_0;
#[cfg(target_os = "espidf")]
const LEDC_TIMER_BUZZER: ledc_timer_t = ledc_timer_t_LEDC_TIMER_1;

/// Scale a 16-bit duty down to the LEDC timer resolution.
pub const fn scale_duty(duty: u16) -> u32 {
    (duty as u32) >> (16 - crate::pins::PWM_RESOLUTION_BITS)
}

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: RGB LED, timer 1: buzzer (frequency re-set on enable).
    for timer_num in [LEDC_TIMER_LED, LEDC_TIMER_BUZZER] {
        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_13_BIT,
            freq_hz: pins::LED_PWM_FREQ_HZ,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        let ret = unsafe { ledc_timer_config(&timer) };
        if ret != ESP_OK { return Err(HwInitError::LedcInitFailed(ret)); }
    }

    let channels = [
        (LEDC_CH_LED_R, pins::LED_R_GPIO, LEDC_TIMER_LED),
        (LEDC_CH_LED_G, pins::LED_G_GPIO, LEDC_TIMER_LED),
        (LEDC_CH_LED_B, pins::LED_B_GPIO, LEDC_TIMER_LED),
        (LEDC_CH_BUZZER, pins::BUZZER_GPIO, LEDC_TIMER_BUZZER),
    ];
    for (channel, gpio_num, timer_sel) in channels {
        let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel,
            gpio_num,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        }) };
        if ret != ESP_OK { return Err(HwInitError::LedcInitFailed(ret)); }
    }

    info!("hw_init: LEDC configured (led=CH0-2, buzzer=CH3, 13-bit)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u16) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, scale_duty(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u16) {}

/// Retune the buzzer timer and resume its channel at zero duty.
#[cfg(target_os = "espidf")]
pub fn buzzer_attach(freq_hz: u32) {
    // SAFETY: timer/channel configured in init_ledc(); main loop only.
    unsafe {
        ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_TIMER_BUZZER, freq_hz);
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER, 0);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_attach(_freq_hz: u32) {}

/// Stop the buzzer channel with the pin idling low.
#[cfg(target_os = "espidf")]
pub fn buzzer_detach() {
    // SAFETY: channel configured in init_ledc(); main loop only.
    unsafe {
        ledc_stop(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER, 0);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_detach() {}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn pir_gpio_isr(_arg: *mut core::ffi::c_void) {
    crate::drivers::motion::on_motion_isr();
}

/// Install the GPIO ISR service and register the PIR rising-edge handler.
///
/// If the PIR output is already high the display request is raised right
/// away, so motion that started before the ISR existed is not lost.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handler registered
    // below only touches the shared atomics.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        gpio_set_intr_type(pins::PIR_GPIO, gpio_int_type_t_GPIO_INTR_POSEDGE);
        let ret = gpio_isr_handler_add(pins::PIR_GPIO, Some(pir_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK { return Err(HwInitError::IsrInstallFailed(ret)); }
        gpio_intr_enable(pins::PIR_GPIO);

        if gpio_get_level(pins::PIR_GPIO) != 0 {
            crate::events::FLAGS.request_display();
        }

        info!("hw_init: ISR service installed (pir)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
