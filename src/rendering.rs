use heapless::String;
use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use crate::diagnostics::{Diagnostic, Measurement};
use crate::evaluator::AlertResult;
use crate::reading::Reading;
use crate::snapshot::Snapshot;

/// Longest status line we render
pub const LINE_LEN: usize = 64;

pub type Line = String<LINE_LEN>;

/// Fixed-point decimal for ufmt, which has no float support
/// value: the number to print
/// places: digits after the decimal point (at most 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    scaled: i32,
    places: u8,
}

impl Decimal {
    pub fn new(value: f32, places: u8) -> Self {
        let places = places.min(4);
        let factor = 10u32.pow(places as u32) as f32;
        Decimal {
            scaled: libm::roundf(value * factor) as i32,
            places,
        }
    }
}

impl uDisplay for Decimal {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let factor = 10u32.pow(self.places as u32);
        let magnitude = self.scaled.unsigned_abs();
        if self.scaled < 0 {
            f.write_str("-")?;
        }
        uwrite!(f, "{}", magnitude / factor)?;
        if self.places > 0 {
            f.write_str(".")?;
            // Zero padded fraction
            let fraction = magnitude % factor;
            let mut divisor = factor / 10;
            while divisor > 0 {
                uwrite!(f, "{}", (fraction / divisor) % 10)?;
                divisor /= 10;
            }
        }
        Ok(())
    }
}

/// Two-digit hex for bus addresses
struct Hex(u8);

impl uDisplay for Hex {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        f.write_str("0x")?;
        f.write_char(DIGITS[(self.0 >> 4) as usize] as char)?;
        f.write_char(DIGITS[(self.0 & 0x0f) as usize] as char)
    }
}

/// Renders a diagnostic as a human-readable status line.
/// A segment that would overflow `LINE_LEN` is left out whole, heapless
/// strings do not take partial writes. Every line below fits.
pub fn render_diagnostic(diagnostic: &Diagnostic) -> Line {
    let mut line = Line::new();
    let _ = match diagnostic {
        Diagnostic::Configured(sensor) => uwrite!(line, "Configured {} sensor", sensor.as_str()),
        Diagnostic::DeviceAbsent { sensor, address } => uwrite!(
            line,
            "{} sensor not found at {} (continuing without it)",
            sensor.as_str(),
            Hex(*address)
        ),
        Diagnostic::WarmingUp { ms } => uwrite!(line, "Warming up for {} ms", ms),
        Diagnostic::Measured(measurement) => render_measurement(&mut line, measurement),
        Diagnostic::ReadFailed { sensor, error } => {
            uwrite!(line, "Failed to read {}: {}", sensor.as_str(), error.as_str())
        }
        Diagnostic::Alert(condition) => uwrite!(line, "ALERT: {}", condition.message()),
        Diagnostic::UplinkFailed => uwrite!(line, "Report delivery failed"),
    };
    line
}

fn render_measurement(line: &mut Line, measurement: &Measurement) -> Result<(), ()> {
    match measurement {
        Measurement::Temperature(celsius) => {
            uwrite!(line, "Temperature: {} C", Decimal::new(*celsius, 1))
        }
        Measurement::Humidity(percent) => uwrite!(line, "Humidity: {} %", Decimal::new(*percent, 1)),
        Measurement::Pressure(hpa) => uwrite!(line, "Pressure: {} hPa", Decimal::new(*hpa, 2)),
        Measurement::Motion(true) => uwrite!(line, "Motion: DETECTED"),
        Measurement::Motion(false) => uwrite!(line, "Motion: None"),
        Measurement::GasLevel(raw) => uwrite!(line, "Gas level: {}", raw),
        Measurement::SoilMoisture(percent) => uwrite!(line, "Soil moisture: {} %", percent),
    }
}

/// One-line cycle summary, `--` marks a failed sensor
/// Format: T 23.4 H 55.0 P 1013.2 M 0 G 123 S 60 [ALERT]
pub fn render_summary(snapshot: &Snapshot, result: &AlertResult) -> Line {
    let mut line = Line::new();
    let _ = write_summary(&mut line, snapshot, result);
    line
}

fn write_summary(line: &mut Line, snapshot: &Snapshot, result: &AlertResult) -> Result<(), ()> {
    write_field(line, "T", snapshot.temperature().map(|v| Decimal::new(v, 1)))?;
    write_field(line, " H", snapshot.humidity().map(|v| Decimal::new(v, 1)))?;
    write_field(line, " P", snapshot.pressure().map(|v| Decimal::new(v, 1)))?;
    write_field(line, " M", snapshot.motion().map(u8::from))?;
    write_field(line, " G", snapshot.gas_level())?;
    write_field(line, " S", snapshot.soil_moisture())?;
    if result.alert() {
        uwrite!(line, " ALERT")?;
    }
    Ok(())
}

fn write_field<T: uDisplay + Copy>(line: &mut Line, label: &str, reading: Reading<T>) -> Result<(), ()> {
    match reading.value() {
        Some(value) => uwrite!(line, "{} {}", label, value),
        None => uwrite!(line, "{} --", label),
    }
}
