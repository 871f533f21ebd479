//! BME680 as a barometer
//!
//! For boards that carry a BME680 instead of a BMP280. The `bme680` crate
//! talks to it through the embedded-hal 0.2 blocking traits. Only pressure
//! is used, gas heating is left off.

use bme680::{
    Bme680, I2CAddress, IIRFilterSize, OversamplingSetting, PowerMode, SettingsBuilder,
};
use embedded_hal_0_2::blocking::delay::DelayMs;
use embedded_hal_0_2::blocking::i2c::{Read, Write};

use super::Barometer;
use crate::error::SensorError;

pub struct Bme680Barometer<I2C, D> {
    device: Option<Bme680<I2C, D>>,
    delay: D,
    address: u8,
}

impl<I2C, D> Bme680Barometer<I2C, D>
where
    I2C: Read + Write,
    D: DelayMs<u8>,
{
    /// Initialising the driver reads the chip id; a missing device leaves
    /// the adapter empty and `probe` reports it
    pub fn new(i2c: I2C, mut delay: D, address: I2CAddress) -> Self {
        let raw_address = match &address {
            I2CAddress::Primary => 0x76,
            I2CAddress::Secondary => 0x77,
            I2CAddress::Other(other) => *other,
        };
        let device = Bme680::init(i2c, &mut delay, address).ok();
        Bme680Barometer {
            device,
            delay,
            address: raw_address,
        }
    }
}

impl<I2C, D> Barometer for Bme680Barometer<I2C, D>
where
    I2C: Read + Write,
    D: DelayMs<u8>,
{
    fn address(&self) -> u8 {
        self.address
    }

    fn probe(&mut self) -> Result<(), SensorError> {
        let device = self.device.as_mut().ok_or(SensorError::NotDetected)?;
        let settings = SettingsBuilder::new()
            .with_humidity_oversampling(OversamplingSetting::OS2x)
            .with_pressure_oversampling(OversamplingSetting::OS16x)
            .with_temperature_oversampling(OversamplingSetting::OS2x)
            .with_temperature_filter(IIRFilterSize::Size3)
            .with_run_gas(false)
            .build();
        device
            .set_sensor_settings(&mut self.delay, settings)
            .map_err(|_| SensorError::Bus)
    }

    fn read_pascals(&mut self) -> Result<f32, SensorError> {
        let device = self.device.as_mut().ok_or(SensorError::NotDetected)?;
        // Forced mode: one conversion, then back to sleep
        device
            .set_sensor_mode(&mut self.delay, PowerMode::ForcedMode)
            .map_err(|_| SensorError::Bus)?;
        let (data, _condition) = device
            .get_sensor_data(&mut self.delay)
            .map_err(|_| SensorError::Bus)?;
        Ok(data.pressure_hpa() * 100.0)
    }
}
