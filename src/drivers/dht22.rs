//! DHT22 (AM2302) temperature and humidity sensor
//!
//! Single-wire protocol, host side:
//!
//! ```text
//!  host start        sensor response     40 data bits
//! ‾‾\______/‾‾‾‾‾\________/‾‾‾‾‾‾‾‾\____/‾‾\____/‾‾‾‾‾‾\ ...
//!    1.1 ms   40us    80us     80us   50us 26us  50us 70us
//!                                          "0"        "1"
//! ```
//!
//! The frame is humidity (2 bytes, tenths of a percent), temperature
//! (2 bytes, tenths of a degree, top bit is the sign) and a checksum byte.
//!
//! The line needs an external pull-up and the pin must work as an open-drain
//! output that can also be read back.
//!
//! Pulses are measured in polling passes, each one pin read plus a 1 us
//! pause. A pass costs more than 1 us on a real MCU, so widths are never
//! compared against absolute times: a bit is 1 when its high pulse lasts
//! longer than the 50 us low in front of it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::{finite, ClimateSensor};
use crate::error::SensorError;

const START_LOW_US: u32 = 1_100;
const START_RELEASE_US: u32 = 40;
/// Polling passes after which the sensor is taken to have stopped talking.
/// At least 200 us whatever a pass costs, the longest legal pulse is 80 us.
const PULSE_TIMEOUT_POLLS: u32 = 200;

/// Raw 5-byte frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; 5]);

impl Frame {
    /// Checks the checksum: low byte of the sum of the data bytes
    pub fn new(bytes: [u8; 5]) -> Result<Self, SensorError> {
        let sum = bytes[..4]
            .iter()
            .fold(0u8, |sum, byte| sum.wrapping_add(*byte));
        if sum != bytes[4] {
            return Err(SensorError::Checksum);
        }
        Ok(Frame(bytes))
    }

    pub fn humidity(&self) -> f32 {
        u16::from_be_bytes([self.0[0], self.0[1]]) as f32 / 10.0
    }

    pub fn temperature(&self) -> f32 {
        let magnitude = u16::from_be_bytes([self.0[2] & 0x7f, self.0[3]]) as f32 / 10.0;
        if self.0[2] & 0x80 != 0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

pub struct Dht22<P, D> {
    pin: P,
    delay: D,
    /// Last transaction; each quantity is served from it once
    frame: Option<Result<Frame, SensorError>>,
    temperature_taken: bool,
    humidity_taken: bool,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Dht22 {
            pin,
            delay,
            frame: None,
            temperature_taken: false,
            humidity_taken: false,
        }
    }

    /// Runs one full bus transaction
    pub fn read_frame(&mut self) -> Result<Frame, SensorError> {
        // Start signal, then let the pull-up take the line
        self.pin.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(START_RELEASE_US);

        // Sensor acknowledges with ~80us low, ~80us high
        self.pulse_length(true)?;
        self.pulse_length(false)?;
        self.pulse_length(true)?;

        let mut bytes = [0u8; 5];
        for bit in 0..40 {
            let low = self.pulse_length(false)?;
            let high = self.pulse_length(true)?;
            if high > low {
                bytes[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Frame::new(bytes)
    }

    /// Waits while the line stays at `high`, returns the number of passes
    fn pulse_length(&mut self, high: bool) -> Result<u32, SensorError> {
        let mut polls = 0;
        while self.pin.is_high().map_err(|_| SensorError::Pin)? == high {
            if polls >= PULSE_TIMEOUT_POLLS {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            polls += 1;
        }
        Ok(polls)
    }

    /// Starts a new transaction unless the cached one still has `taken == false`
    fn frame_for(&mut self, temperature: bool) -> Result<Frame, SensorError> {
        let taken = if temperature {
            self.temperature_taken
        } else {
            self.humidity_taken
        };
        let frame = match self.frame {
            Some(frame) if !taken => frame,
            _ => {
                let frame = self.read_frame();
                self.frame = Some(frame);
                self.temperature_taken = false;
                self.humidity_taken = false;
                frame
            }
        };
        if temperature {
            self.temperature_taken = true;
        } else {
            self.humidity_taken = true;
        }
        frame
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P, D> ClimateSensor for Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        finite(self.frame_for(true)?.temperature())
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        finite(self.frame_for(false)?.humidity())
    }
}
