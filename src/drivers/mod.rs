//! Sensor drivers
//!
//! Each hardware family sits behind a small trait so the sampler never sees
//! timing or bus details, and tests can plug in fakes:
//!
//! - **ClimateSensor**: temperature and humidity (DHT22 over a single wire)
//! - **Barometer**: pressure in pascals (BMP280 or BME680 over I2C)
//! - **AnalogInput**: one ADC channel (gas sensor, soil probe)
//!
//! The PIR sensor is a plain `embedded_hal::digital::InputPin`.

pub mod analog;
pub mod bme680;
pub mod bmp280;
pub mod dht22;
pub mod pir;

pub use analog::{remap, AnalogInput, GasSensor, SoilMoistureSensor};
pub use bme680::Bme680Barometer;
pub use bmp280::Bmp280;
pub use dht22::Dht22;
pub use pir::PirSensor;

use crate::error::SensorError;

/// Combined temperature and humidity sensor
pub trait ClimateSensor {
    /// Degrees Celsius
    fn read_temperature(&mut self) -> Result<f32, SensorError>;

    /// Percent relative humidity
    fn read_humidity(&mut self) -> Result<f32, SensorError>;
}

/// Absolute pressure sensor on a shared bus
pub trait Barometer {
    /// Bus address the device is expected at
    fn address(&self) -> u8;

    /// Checks the device is present and configures it.
    /// Called once at startup, before any read.
    fn probe(&mut self) -> Result<(), SensorError>;

    /// Pressure in pascals
    fn read_pascals(&mut self) -> Result<f32, SensorError>;
}

impl<T: ClimateSensor + ?Sized> ClimateSensor for &mut T {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        (**self).read_temperature()
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        (**self).read_humidity()
    }
}

impl<T: Barometer + ?Sized> Barometer for &mut T {
    fn address(&self) -> u8 {
        (**self).address()
    }

    fn probe(&mut self) -> Result<(), SensorError> {
        (**self).probe()
    }

    fn read_pascals(&mut self) -> Result<f32, SensorError> {
        (**self).read_pascals()
    }
}

/// Rejects NaN and infinities, which some sensors report on a bad read
pub(crate) fn finite(value: f32) -> Result<f32, SensorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SensorError::NotANumber)
    }
}

/// Pascals to hectopascals. A conversion of exactly zero is a failed read:
/// a real 0 Pa cannot be told apart from it.
pub fn pascals_to_hpa(pascals: f32) -> Result<f32, SensorError> {
    let hpa = finite(pascals)? / 100.0;
    if hpa == 0.0 {
        return Err(SensorError::ZeroPressure);
    }
    Ok(hpa)
}
