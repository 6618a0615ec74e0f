//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements             | Connects to                 |
//! |----------------|------------------------|-----------------------------|
//! | `environment`  | SensorPort             | BME680 over shared I²C      |
//! | `hardware`     | SensorPort, AnalogPort | sensor, ADC1 (battery)      |
//! |                | ActuatorPort           | LEDC PWM (RGB LED, buzzer)  |
//! |                | DisplayPort            | display adapter             |
//! |                | DisplayTimer           | esp_timer page timer        |
//! | `log_sink`     | EventSink              | Serial log output           |
//! | `oled`         | DisplayPort            | SSD1306 64x48 over I²C      |
//! | `rtc_memory`   | RetainedStore          | RTC slow memory             |
//! | `time`         | ClockPort              | RTC time of day             |

#[cfg(target_os = "espidf")]
pub mod environment;
pub mod hardware;
pub mod log_sink;
#[cfg(target_os = "espidf")]
pub mod oled;
pub mod rtc_memory;
pub mod time;

/// Handle to the I²C bus shared by the sensor and the display.
#[cfg(target_os = "espidf")]
pub type SharedI2c =
    shared_bus::I2cProxy<'static, std::sync::Mutex<esp_idf_hal::i2c::I2cDriver<'static>>>;
