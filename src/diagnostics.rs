//! Best-effort status output.
//!
//! Drivers, the sampler and the evaluator report what they did through a
//! `DiagnosticSink`. Nothing in the core branches on whether a sink kept a
//! diagnostic or dropped it.

use heapless::Vec;

use crate::error::SensorError;
use crate::evaluator::Condition;

/// The physical sensors on the node, in sampling order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    Temperature,
    Humidity,
    Pressure,
    Motion,
    GasLevel,
    SoilMoisture,
}

impl SensorKind {
    pub const ALL: [SensorKind; 6] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::Pressure,
        SensorKind::Motion,
        SensorKind::GasLevel,
        SensorKind::SoilMoisture,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Pressure => "pressure",
            SensorKind::Motion => "motion",
            SensorKind::GasLevel => "gas level",
            SensorKind::SoilMoisture => "soil moisture",
        }
    }
}

/// A successfully read value, tagged with its quantity
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Measurement {
    Temperature(f32),
    Humidity(f32),
    Pressure(f32),
    Motion(bool),
    GasLevel(u16),
    SoilMoisture(u8),
}

impl Measurement {
    pub const fn kind(&self) -> SensorKind {
        match self {
            Measurement::Temperature(_) => SensorKind::Temperature,
            Measurement::Humidity(_) => SensorKind::Humidity,
            Measurement::Pressure(_) => SensorKind::Pressure,
            Measurement::Motion(_) => SensorKind::Motion,
            Measurement::GasLevel(_) => SensorKind::GasLevel,
            Measurement::SoilMoisture(_) => SensorKind::SoilMoisture,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// Sensor I/O configured during init
    Configured(SensorKind),
    /// Device did not answer at its bus address during init
    DeviceAbsent { sensor: SensorKind, address: u8 },
    /// Warm-up pause before the first trusted reading
    WarmingUp { ms: u32 },
    Measured(Measurement),
    ReadFailed { sensor: SensorKind, error: SensorError },
    /// A threshold was crossed
    Alert(Condition),
    /// The uplink refused a report
    UplinkFailed,
}

impl Diagnostic {
    /// Failures and alerts, as opposed to routine progress
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Diagnostic::DeviceAbsent { .. }
                | Diagnostic::ReadFailed { .. }
                | Diagnostic::Alert(_)
                | Diagnostic::UplinkFailed
        )
    }
}

/// Append-only output channel for diagnostics
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Keeps the first `N` diagnostics, later ones are counted and dropped
#[derive(Debug, Default)]
pub struct MemorySink<const N: usize> {
    entries: Vec<Diagnostic, N>,
    dropped: usize,
}

impl<const N: usize> MemorySink<N> {
    pub fn new() -> Self {
        MemorySink {
            entries: Vec::new(),
            dropped: 0,
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Alerts recorded so far, in emission order
    pub fn alerts(&self) -> impl Iterator<Item = Condition> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Diagnostic::Alert(condition) => Some(*condition),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }
}

impl<const N: usize> DiagnosticSink for MemorySink<N> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if self.entries.push(diagnostic).is_err() {
            self.dropped += 1;
        }
    }
}

/// Prints rendered status lines over defmt
#[cfg(feature = "defmt")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl DiagnosticSink for DefmtSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let line = crate::rendering::render_diagnostic(&diagnostic);
        if diagnostic.is_warning() {
            defmt::warn!("{=str}", line.as_str());
        } else {
            defmt::info!("{=str}", line.as_str());
        }
    }
}

/// Prints rendered status lines through the `log` facade
#[cfg(feature = "log")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[cfg(feature = "log")]
impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let line = crate::rendering::render_diagnostic(&diagnostic);
        if diagnostic.is_warning() {
            log::warn!("{}", line.as_str());
        } else {
            log::info!("{}", line.as_str());
        }
    }
}
