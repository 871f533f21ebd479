use embedded_hal::digital::InputPin;

use crate::error::SensorError;

/// Passive infrared motion sensor on a digital input.
/// Reports the line level at the instant of the read, with no debouncing
/// and no latching of earlier edges.
pub struct PirSensor<P> {
    pin: P,
}

impl<P: InputPin> PirSensor<P> {
    pub fn new(pin: P) -> Self {
        PirSensor { pin }
    }

    /// true while the sensor output is high
    pub fn read(&mut self) -> Result<bool, SensorError> {
        self.pin.is_high().map_err(|_| SensorError::Pin)
    }

    pub fn release(self) -> P {
        self.pin
    }
}
