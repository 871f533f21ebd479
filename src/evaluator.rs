//! Threshold evaluation
//!
//! Classifies a snapshot against the configured safety limits. Five conditions
//! are checked, every one of them on every call, so that a snapshot breaching
//! several limits reports all of them.
//!
//! Pressure and motion are reported but never alarm. There are no limits for
//! them in the configuration.
//!
//! The configuration is trusted as given. With `temperature_low` above
//! `temperature_high` every temperature alarms.

use serde::{Serialize, Serializer};

use crate::config::ThresholdConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::snapshot::Snapshot;

/// A single threshold breach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Condition {
    /// temperature > temperature_high
    TemperatureHigh,
    /// temperature < temperature_low
    TemperatureLow,
    /// humidity > humidity_high
    HumidityHigh,
    /// gas level > gas_high
    GasHigh,
    /// soil moisture < soil_moisture_low
    SoilDry,
}

impl Condition {
    /// Evaluation order
    pub const ALL: [Condition; 5] = [
        Condition::TemperatureHigh,
        Condition::TemperatureLow,
        Condition::HumidityHigh,
        Condition::GasHigh,
        Condition::SoilDry,
    ];

    /// Whether this condition holds. A failed reading compares as its
    /// sentinel, so a dead temperature sensor reads 0.0 and is too cold.
    pub fn holds(&self, snapshot: &Snapshot, config: &ThresholdConfig) -> bool {
        match self {
            Condition::TemperatureHigh => {
                snapshot.temperature().or_sentinel() > config.temperature_high
            }
            Condition::TemperatureLow => {
                snapshot.temperature().or_sentinel() < config.temperature_low
            }
            Condition::HumidityHigh => snapshot.humidity().or_sentinel() > config.humidity_high,
            Condition::GasHigh => snapshot.gas_level().or_sentinel() > config.gas_high,
            Condition::SoilDry => snapshot.soil_moisture().or_sentinel() < config.soil_moisture_low,
        }
    }

    /// Identifier used in reports
    pub const fn as_str(&self) -> &'static str {
        match self {
            Condition::TemperatureHigh => "temperature_high",
            Condition::TemperatureLow => "temperature_low",
            Condition::HumidityHigh => "humidity_high",
            Condition::GasHigh => "gas_high",
            Condition::SoilDry => "soil_dry",
        }
    }

    /// Status-line text
    pub const fn message(&self) -> &'static str {
        match self {
            Condition::TemperatureHigh => "Temperature too high!",
            Condition::TemperatureLow => "Temperature too low!",
            Condition::HumidityHigh => "Humidity too high!",
            Condition::GasHigh => "Gas detected!",
            Condition::SoilDry => "Soil too dry!",
        }
    }

    const fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// Conditions that triggered during one evaluation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertResult {
    triggered: u8,
}

impl AlertResult {
    /// Aggregate signal: at least one condition holds
    pub fn alert(&self) -> bool {
        self.triggered != 0
    }

    pub fn contains(&self, condition: Condition) -> bool {
        self.triggered & condition.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.triggered.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.triggered == 0
    }

    /// Triggered conditions in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        Condition::ALL
            .into_iter()
            .filter(move |condition| self.contains(*condition))
    }

    fn insert(&mut self, condition: Condition) {
        self.triggered |= condition.bit();
    }
}

impl FromIterator<Condition> for AlertResult {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut result = AlertResult::default();
        for condition in iter {
            result.insert(condition);
        }
        result
    }
}

/// Serialized as the list of condition identifiers
impl Serialize for AlertResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|condition| condition.as_str()))
    }
}

/// Checks `snapshot` against `config`, emitting one alert diagnostic per
/// breached limit
pub fn evaluate<K: DiagnosticSink>(
    snapshot: &Snapshot,
    config: &ThresholdConfig,
    sink: &mut K,
) -> AlertResult {
    let mut result = AlertResult::default();
    for condition in Condition::ALL {
        if condition.holds(snapshot, config) {
            sink.emit(Diagnostic::Alert(condition));
            result.insert(condition);
        }
    }
    result
}
