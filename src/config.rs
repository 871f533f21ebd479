use crate::error::ConfigError;

/// Send a report every 10 seconds
pub const SEND_INTERVAL_MS: u32 = 10_000;
/// Pause between consecutive sensor reads
pub const SETTLE_DELAY_MS: u32 = 100;
/// Analog sensors need this long after power-on before readings are trusted
pub const WARMUP_MS: u32 = 2_000;
/// Worst-case latency of a single driver read. The DHT22 dominates.
pub const DRIVER_READ_BUDGET_MS: u32 = 50;
/// Number of driver reads in one sampling cycle
pub const READS_PER_CYCLE: u32 = 6;

/// Full-scale value of a 12-bit ADC
pub const ADC_MAX_RAW: u16 = 4095;
/// BMP280 with SDO tied low
pub const BMP280_ADDRESS: u8 = 0x76;

pub const DEVICE_ID: &str = "ESP32_001";

/// Safety limits the evaluator compares a snapshot against.
/// All comparisons are exclusive: a reading equal to a limit does not alarm.
/// temperature_high / temperature_low: °C
/// humidity_high: %RH
/// gas_high: raw ADC units, same scale as the gas reading
/// soil_moisture_low: percent
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThresholdConfig {
    pub temperature_high: f32,
    pub temperature_low: f32,
    pub humidity_high: f32,
    pub gas_high: u16,
    pub soil_moisture_low: u8,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        ThresholdConfig {
            temperature_high: 35.0,
            temperature_low: 10.0,
            humidity_high: 80.0,
            gas_high: 500,
            soil_moisture_low: 30,
        }
    }
}

/// Timing of the sampling loop, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    pub send_interval_ms: u32,
    pub settle_delay_ms: u32,
    pub warmup_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            send_interval_ms: SEND_INTERVAL_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
            warmup_ms: WARMUP_MS,
        }
    }
}

impl TimingConfig {
    /// Worst-case duration of one `read_all`: every driver read plus the
    /// settling pauses between them
    pub fn cycle_budget_ms(&self) -> u32 {
        READS_PER_CYCLE
            .saturating_mul(DRIVER_READ_BUDGET_MS)
            .saturating_add((READS_PER_CYCLE - 1).saturating_mul(self.settle_delay_ms))
    }

    /// Checks that a full cycle fits inside the send interval
    pub fn check(&self) -> Result<(), ConfigError> {
        let cycle_ms = self.cycle_budget_ms();
        if self.send_interval_ms <= cycle_ms {
            return Err(ConfigError::IntervalTooShort {
                interval_ms: self.send_interval_ms,
                cycle_ms,
            });
        }
        Ok(())
    }
}

/// Everything the core needs from the configuration collaborator.
/// Pin assignments are board specific and live with the board entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    pub device_id: &'static str,
    pub thresholds: ThresholdConfig,
    pub timing: TimingConfig,
    /// Emit per-read diagnostics
    pub debug: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            device_id: DEVICE_ID,
            thresholds: ThresholdConfig::default(),
            timing: TimingConfig::default(),
            debug: true,
        }
    }
}
