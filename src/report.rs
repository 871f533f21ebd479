use serde::Serialize;

use crate::evaluator::AlertResult;
use crate::snapshot::Snapshot;

/// What the node hands to the transport after every cycle.
///
/// Serializes to the collector's payload:
///
/// ```json
/// {
///   "device_id": "ESP32_001",
///   "sensors": {
///     "temperature": 23.5, "humidity": 41.0, "pressure": 1013.2,
///     "motion": false, "gasLevel": 180, "soilMoisture": 62
///   },
///   "alert": false,
///   "conditions": []
/// }
/// ```
///
/// Sensors that failed this cycle are `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Report<'a> {
    pub device_id: &'a str,
    pub sensors: Snapshot,
    pub alert: bool,
    pub conditions: AlertResult,
}

impl<'a> Report<'a> {
    pub fn new(device_id: &'a str, sensors: Snapshot, result: AlertResult) -> Self {
        Report {
            device_id,
            sensors,
            alert: result.alert(),
            conditions: result,
        }
    }
}

/// Delivers reports to the remote collector. Implemented by the transport.
pub trait Uplink {
    type Error;

    fn send(&mut self, report: &Report<'_>) -> Result<(), Self::Error>;
}

impl<U: Uplink + ?Sized> Uplink for &mut U {
    type Error = U::Error;

    fn send(&mut self, report: &Report<'_>) -> Result<(), Self::Error> {
        (**self).send(report)
    }
}
