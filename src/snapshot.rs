use serde::Serialize;

use crate::reading::Reading;

/// One complete set of readings from a single sampling cycle.
///
/// Every field is populated, a sensor that could not be read holds
/// `Reading::Failed`. Fields are private so a snapshot cannot change after
/// the sampler builds it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    temperature: Reading<f32>,
    humidity: Reading<f32>,
    pressure: Reading<f32>,
    motion: Reading<bool>,
    gas_level: Reading<u16>,
    soil_moisture: Reading<u8>,
}

impl Snapshot {
    pub const fn new(
        temperature: Reading<f32>,
        humidity: Reading<f32>,
        pressure: Reading<f32>,
        motion: Reading<bool>,
        gas_level: Reading<u16>,
        soil_moisture: Reading<u8>,
    ) -> Self {
        Snapshot {
            temperature,
            humidity,
            pressure,
            motion,
            gas_level,
            soil_moisture,
        }
    }

    /// Degrees Celsius
    pub fn temperature(&self) -> Reading<f32> {
        self.temperature
    }

    /// Percent relative humidity
    pub fn humidity(&self) -> Reading<f32> {
        self.humidity
    }

    /// Hectopascals
    pub fn pressure(&self) -> Reading<f32> {
        self.pressure
    }

    /// PIR level at the instant of the read
    pub fn motion(&self) -> Reading<bool> {
        self.motion
    }

    /// Raw ADC units
    pub fn gas_level(&self) -> Reading<u16> {
        self.gas_level
    }

    /// Percent, 0 = dry
    pub fn soil_moisture(&self) -> Reading<u8> {
        self.soil_moisture
    }

    /// Number of sensors that failed this cycle
    pub fn failed_count(&self) -> usize {
        [
            self.temperature.is_failed(),
            self.humidity.is_failed(),
            self.pressure.is_failed(),
            self.motion.is_failed(),
            self.gas_level.is_failed(),
            self.soil_moisture.is_failed(),
        ]
        .iter()
        .filter(|failed| **failed)
        .count()
    }
}
