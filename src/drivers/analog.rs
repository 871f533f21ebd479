use crate::config::ADC_MAX_RAW;
use crate::error::SensorError;

/// One analog-to-digital channel
pub trait AnalogInput {
    /// A single raw conversion
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        (**self).read_raw()
    }
}

/// Linear rescale with integer truncation, like Arduino's `map`.
/// `in_min` may be larger than `in_max` to invert the mapping.
/// The result is not clamped.
pub const fn remap(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// MQ-series gas sensor. Raw units, no calibration, the threshold is
/// expressed in the same units.
pub struct GasSensor<A> {
    adc: A,
}

impl<A: AnalogInput> GasSensor<A> {
    pub fn new(adc: A) -> Self {
        GasSensor { adc }
    }

    pub fn read(&mut self) -> Result<u16, SensorError> {
        self.adc.read_raw()
    }
}

/// Capacitive or resistive soil probe. A higher raw value means drier soil.
pub struct SoilMoistureSensor<A> {
    adc: A,
    max_raw: u16,
}

impl<A: AnalogInput> SoilMoistureSensor<A> {
    /// Probe on a 12-bit converter
    pub fn new(adc: A) -> Self {
        Self::with_max_raw(adc, ADC_MAX_RAW)
    }

    /// max_raw: the reading of a fully dry probe
    pub fn with_max_raw(adc: A, max_raw: u16) -> Self {
        SoilMoistureSensor { adc, max_raw }
    }

    /// Moisture percentage, 0 (dry) to 100 (wet)
    pub fn read(&mut self) -> Result<u8, SensorError> {
        let raw = self.adc.read_raw()?;
        Ok(self.percent(raw))
    }

    /// Inverse mapping from `[max_raw, 0]` onto `[0, 100]`, clamped
    pub fn percent(&self, raw: u16) -> u8 {
        remap(raw as i32, self.max_raw as i32, 0, 0, 100).clamp(0, 100) as u8
    }
}
