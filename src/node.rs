use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::config::NodeConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::drivers::{AnalogInput, Barometer, ClimateSensor};
use crate::evaluator::{evaluate, AlertResult};
use crate::report::{Report, Uplink};
use crate::sampler::Sampler;
use crate::snapshot::Snapshot;

/// Outcome of one sampling cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cycle {
    pub snapshot: Snapshot,
    pub result: AlertResult,
    /// Whether the uplink accepted the report
    pub delivered: bool,
}

/// Sample, evaluate, hand off. Runs to completion, nothing in it is fatal:
/// a refused report is logged and reflected in `Cycle::delivered`.
pub fn run_cycle<C, B, M, G, S, D, U, K>(
    sampler: &mut Sampler<C, B, M, G, S, D>,
    config: &NodeConfig,
    uplink: &mut U,
    sink: &mut K,
) -> Cycle
where
    C: ClimateSensor,
    B: Barometer,
    M: InputPin,
    G: AnalogInput,
    S: AnalogInput,
    D: DelayNs,
    U: Uplink,
    K: DiagnosticSink,
{
    let snapshot = sampler.read_all(sink);
    let result = evaluate(&snapshot, &config.thresholds, sink);

    let report = Report::new(config.device_id, snapshot, result);
    let delivered = match uplink.send(&report) {
        Ok(()) => true,
        Err(_) => {
            sink.emit(Diagnostic::UplinkFailed);
            false
        }
    };

    Cycle {
        snapshot,
        result,
        delivered,
    }
}
