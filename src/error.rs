use thiserror_no_std::Error;

/// Why a single sensor read produced no value.
/// A failed read is recovered into `Reading::Failed`, it never aborts a cycle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The device answered but the value is not a number
    #[error("reading is not a number")]
    NotANumber,

    /// Single-wire frame checksum mismatch
    #[error("checksum mismatch")]
    Checksum,

    /// Sensor did not drive the line within the protocol window
    #[error("timed out waiting for sensor")]
    Timeout,

    /// I2C or ADC transfer failed
    #[error("bus transfer failed")]
    Bus,

    /// GPIO read or write failed
    #[error("pin access failed")]
    Pin,

    /// Device was not found during initialisation
    #[error("device not detected")]
    NotDetected,

    /// Raw pressure conversion came back as exactly zero
    #[error("pressure conversion returned zero")]
    ZeroPressure,
}

impl SensorError {
    /// Short label for status lines
    pub const fn as_str(&self) -> &'static str {
        match self {
            SensorError::NotANumber => "not a number",
            SensorError::Checksum => "checksum",
            SensorError::Timeout => "timeout",
            SensorError::Bus => "bus error",
            SensorError::Pin => "pin error",
            SensorError::NotDetected => "not detected",
            SensorError::ZeroPressure => "zero pressure",
        }
    }
}

/// Configuration problems found at startup.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A sampling cycle could take longer than the reporting interval
    #[error("send interval {interval_ms} ms is not longer than a {cycle_ms} ms sampling cycle")]
    IntervalTooShort {
        /// Configured send interval
        interval_ms: u32,
        /// Worst-case cycle latency
        cycle_ms: u32,
    },
}
