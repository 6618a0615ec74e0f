//! BME680 environment sensor adapter.
//!
//! Implements [`SensorPort`] on top of the `bme680` driver.  Each read
//! triggers one forced-mode measurement (heater 320 °C for 150 ms), waits
//! out the profile duration and returns all four quantities.
//!
//! A failed measurement is logged and the previous good reading returned;
//! the duty cycle keeps going and the next wake tries again.

use std::time::Duration;

use bme680::{
    Bme680, FieldDataCondition, I2CAddress, IIRFilterSize, OversamplingSetting, PowerMode,
    SettingsBuilder,
};
use esp_idf_hal::delay::Ets;
use log::{info, warn};

use super::SharedI2c;
use crate::app::ports::SensorPort;
use crate::error::SensorError;
use crate::sensors::SensorReading;

const HEATER_TEMP_C: u16 = 320;
const HEATER_DURATION: Duration = Duration::from_millis(150);
const AMBIENT_TEMP_C: i8 = 25;

pub struct Bme680Sensor {
    dev: Bme680<SharedI2c, Ets>,
    delay: Ets,
    profile: Duration,
    last: SensorReading,
}

impl Bme680Sensor {
    /// Probe the sensor at 0x77 and apply the measurement profile.
    pub fn new(i2c: SharedI2c) -> Result<Self, SensorError> {
        let mut delay = Ets;
        let mut dev = Bme680::init(i2c, &mut delay, I2CAddress::Secondary).map_err(|e| {
            warn!("bme680: init failed: {:?}", e);
            SensorError::BusFault
        })?;

        let settings = SettingsBuilder::new()
            .with_humidity_oversampling(OversamplingSetting::OS2x)
            .with_pressure_oversampling(OversamplingSetting::OS4x)
            .with_temperature_oversampling(OversamplingSetting::OS8x)
            .with_temperature_filter(IIRFilterSize::Size3)
            .with_gas_measurement(HEATER_DURATION, HEATER_TEMP_C, AMBIENT_TEMP_C)
            .with_run_gas(true)
            .build();

        dev.set_sensor_settings(&mut delay, settings).map_err(|e| {
            warn!("bme680: settings rejected: {:?}", e);
            SensorError::BusFault
        })?;
        let profile = dev.get_profile_dur(&settings.0).map_err(|e| {
            warn!("bme680: profile duration: {:?}", e);
            SensorError::BusFault
        })?;

        info!("bme680: ready (profile {}ms)", profile.as_millis());
        Ok(Self {
            dev,
            delay,
            profile,
            last: SensorReading::default(),
        })
    }

    fn measure(&mut self) -> Result<SensorReading, SensorError> {
        self.dev
            .set_sensor_mode(&mut self.delay, PowerMode::ForcedMode)
            .map_err(|_| SensorError::BusFault)?;
        std::thread::sleep(self.profile);
        let (data, condition) = self
            .dev
            .get_sensor_data(&mut self.delay)
            .map_err(|_| SensorError::BusFault)?;
        if matches!(condition, FieldDataCondition::Unchanged) {
            return Err(SensorError::NoNewData);
        }
        Ok(SensorReading {
            temperature_c: data.temperature_celsius() as f32,
            humidity_pct: data.humidity_percent() as f32,
            pressure_hpa: data.pressure_hpa() as f32,
            gas_ohm: data.gas_resistance_ohm() as f32,
        })
    }
}

impl SensorPort for Bme680Sensor {
    fn read(&mut self) -> SensorReading {
        match self.measure() {
            Ok(reading) => self.last = reading,
            Err(e) => warn!("bme680: {}, keeping last reading", e),
        }
        self.last
    }
}
