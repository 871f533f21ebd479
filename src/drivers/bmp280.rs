//! Bosch BMP280 barometer over I2C
//!
//! Only the pressure path is exposed. Temperature is still converted on every
//! read because pressure compensation depends on it (`t_fine`).

use embedded_hal::i2c::I2c;

use super::Barometer;
use crate::error::SensorError;

const REG_CALIBRATION: u8 = 0x88;
const REG_CHIP_ID: u8 = 0xD0;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_PRESS_MSB: u8 = 0xF7;

const CHIP_ID: u8 = 0x58;

/// Normal mode, temperature x2, pressure x16
const CTRL_MEAS_NORMAL: u8 = (0b010 << 5) | (0b101 << 2) | 0b11;
/// 500 ms standby, IIR filter x16
const CONFIG_FILTERED: u8 = (0b100 << 5) | (0b100 << 2);

/// ADC value the chip reports for a skipped measurement
const SKIPPED: i32 = 0x80000;

/// Factory trimming parameters, registers 0x88..0x9F
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Calibration {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl Calibration {
    pub fn from_registers(raw: &[u8; 24]) -> Self {
        let unsigned = |i: usize| u16::from_le_bytes([raw[i], raw[i + 1]]);
        let signed = |i: usize| i16::from_le_bytes([raw[i], raw[i + 1]]);
        Calibration {
            dig_t1: unsigned(0),
            dig_t2: signed(2),
            dig_t3: signed(4),
            dig_p1: unsigned(6),
            dig_p2: signed(8),
            dig_p3: signed(10),
            dig_p4: signed(12),
            dig_p5: signed(14),
            dig_p6: signed(16),
            dig_p7: signed(18),
            dig_p8: signed(20),
            dig_p9: signed(22),
        }
    }

    /// Datasheet integer compensation. Returns `t_fine`.
    pub fn t_fine(&self, adc_t: i32) -> i32 {
        let t1 = self.dig_t1 as i32;
        let var1 = (((adc_t >> 3) - (t1 << 1)) * self.dig_t2 as i32) >> 11;
        let var2 = (((((adc_t >> 4) - t1) * ((adc_t >> 4) - t1)) >> 12) * self.dig_t3 as i32) >> 14;
        var1 + var2
    }

    /// Degrees Celsius
    pub fn temperature(&self, adc_t: i32) -> f32 {
        ((self.t_fine(adc_t) * 5 + 128) >> 8) as f32 / 100.0
    }

    /// Datasheet 64-bit compensation, pascals.
    /// Returns 0 when the calibration would divide by zero.
    pub fn pressure(&self, adc_p: i32, t_fine: i32) -> f32 {
        let mut var1 = t_fine as i64 - 128_000;
        let mut var2 = var1 * var1 * self.dig_p6 as i64;
        var2 += (var1 * self.dig_p5 as i64) << 17;
        var2 += (self.dig_p4 as i64) << 35;
        var1 = ((var1 * var1 * self.dig_p3 as i64) >> 8) + ((var1 * self.dig_p2 as i64) << 12);
        var1 = (((1i64 << 47) + var1) * self.dig_p1 as i64) >> 33;
        if var1 == 0 {
            return 0.0;
        }
        let mut p = 1_048_576 - adc_p as i64;
        p = (((p << 31) - var2) * 3125) / var1;
        var1 = (self.dig_p9 as i64 * (p >> 13) * (p >> 13)) >> 25;
        var2 = (self.dig_p8 as i64 * p) >> 19;
        p = ((p + var1 + var2) >> 8) + ((self.dig_p7 as i64) << 4);
        // Q24.8
        p as f32 / 256.0
    }
}

pub struct Bmp280<I> {
    i2c: I,
    address: u8,
    calibration: Option<Calibration>,
}

impl<I: I2c> Bmp280<I> {
    /// Nothing is sent on the bus until `probe`
    pub fn new(i2c: I, address: u8) -> Self {
        Bmp280 {
            i2c,
            address,
            calibration: None,
        }
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn release(self) -> I {
        self.i2c
    }

    fn read_registers(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), SensorError> {
        self.i2c
            .write_read(self.address, &[register], buffer)
            .map_err(|_| SensorError::Bus)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| SensorError::Bus)
    }

    /// Raw 20-bit pressure and temperature conversions
    fn read_adc(&mut self) -> Result<(i32, i32), SensorError> {
        let mut data = [0u8; 6];
        self.read_registers(REG_PRESS_MSB, &mut data)?;
        let unpack = |b: &[u8]| ((b[0] as i32) << 12) | ((b[1] as i32) << 4) | ((b[2] as i32) >> 4);
        Ok((unpack(&data[0..3]), unpack(&data[3..6])))
    }
}

impl<I: I2c> Barometer for Bmp280<I> {
    fn address(&self) -> u8 {
        self.address
    }

    fn probe(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8];
        self.read_registers(REG_CHIP_ID, &mut id)
            .map_err(|_| SensorError::NotDetected)?;
        if id[0] != CHIP_ID {
            return Err(SensorError::NotDetected);
        }

        let mut raw = [0u8; 24];
        self.read_registers(REG_CALIBRATION, &mut raw)?;
        // Config first: writes to 0xF5 are ignored outside sleep mode
        self.write_register(REG_CONFIG, CONFIG_FILTERED)?;
        self.write_register(REG_CTRL_MEAS, CTRL_MEAS_NORMAL)?;
        self.calibration = Some(Calibration::from_registers(&raw));
        Ok(())
    }

    fn read_pascals(&mut self) -> Result<f32, SensorError> {
        let calibration = self.calibration.ok_or(SensorError::NotDetected)?;
        let (adc_p, adc_t) = self.read_adc()?;
        if adc_p == SKIPPED || adc_t == SKIPPED {
            return Err(SensorError::NotANumber);
        }
        let pascals = calibration.pressure(adc_p, calibration.t_fine(adc_t));
        // Out-of-range conversions can compensate below zero. Exactly zero is
        // left to `pascals_to_hpa`, which reports it as `ZeroPressure`.
        if pascals < 0.0 {
            return Err(SensorError::NotANumber);
        }
        Ok(pascals)
    }
}
