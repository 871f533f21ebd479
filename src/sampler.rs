//! Sampling orchestrator
//!
//! Reads every sensor once per cycle, always in the same order, with a fixed
//! settling pause between consecutive reads:
//!
//! ```text
//! temperature -> humidity -> pressure -> motion -> gas level -> soil moisture
//! ```
//!
//! The pauses keep one read from disturbing the next on shared supply and bus
//! lines. They are blocking waits and the reads are never interleaved.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::config::TimingConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Measurement, SensorKind};
use crate::drivers::{
    pascals_to_hpa, AnalogInput, Barometer, ClimateSensor, GasSensor, PirSensor,
    SoilMoistureSensor,
};
use crate::error::SensorError;
use crate::reading::Reading;
use crate::snapshot::Snapshot;

/// Driver handles for every sensor on the node
pub struct Sensors<C, B, M, G, S> {
    pub climate: C,
    pub barometer: B,
    pub motion: PirSensor<M>,
    pub gas: GasSensor<G>,
    pub soil: SoilMoistureSensor<S>,
}

/// Owns the sensors, the bus and the delay for the whole life of the node
pub struct Sampler<C, B, M, G, S, D> {
    sensors: Sensors<C, B, M, G, S>,
    delay: D,
    settle_delay_ms: u32,
    barometer_present: bool,
}

impl<C, B, M, G, S, D> Sampler<C, B, M, G, S, D>
where
    C: ClimateSensor,
    B: Barometer,
    M: InputPin,
    G: AnalogInput,
    S: AnalogInput,
    D: DelayNs,
{
    /// One-time startup: probe the barometer, then wait for the analog
    /// sensors to settle.
    /// A missing barometer is not fatal, every pressure read will fail instead.
    pub fn init<K: DiagnosticSink>(
        mut sensors: Sensors<C, B, M, G, S>,
        mut delay: D,
        timing: &TimingConfig,
        sink: &mut K,
    ) -> Self {
        sink.emit(Diagnostic::Configured(SensorKind::Temperature));
        sink.emit(Diagnostic::Configured(SensorKind::Humidity));

        let barometer_present = match sensors.barometer.probe() {
            Ok(()) => {
                sink.emit(Diagnostic::Configured(SensorKind::Pressure));
                true
            }
            Err(_) => {
                sink.emit(Diagnostic::DeviceAbsent {
                    sensor: SensorKind::Pressure,
                    address: sensors.barometer.address(),
                });
                false
            }
        };

        sink.emit(Diagnostic::Configured(SensorKind::Motion));
        sink.emit(Diagnostic::Configured(SensorKind::GasLevel));
        sink.emit(Diagnostic::Configured(SensorKind::SoilMoisture));

        sink.emit(Diagnostic::WarmingUp {
            ms: timing.warmup_ms,
        });
        delay.delay_ms(timing.warmup_ms);

        Sampler {
            sensors,
            delay,
            settle_delay_ms: timing.settle_delay_ms,
            barometer_present,
        }
    }

    pub fn barometer_present(&self) -> bool {
        self.barometer_present
    }

    /// Reads every sensor exactly once. Never aborts: a sensor that fails
    /// shows up as `Reading::Failed` in its field.
    pub fn read_all<K: DiagnosticSink>(&mut self, sink: &mut K) -> Snapshot {
        let temperature = self.read_temperature(sink);
        self.settle();
        let humidity = self.read_humidity(sink);
        self.settle();
        let pressure = self.read_pressure(sink);
        self.settle();
        let motion = self.read_motion(sink);
        self.settle();
        let gas_level = self.read_gas_level(sink);
        self.settle();
        let soil_moisture = self.read_soil_moisture(sink);

        Snapshot::new(
            temperature,
            humidity,
            pressure,
            motion,
            gas_level,
            soil_moisture,
        )
    }

    pub fn read_temperature<K: DiagnosticSink>(&mut self, sink: &mut K) -> Reading<f32> {
        let result = self.sensors.climate.read_temperature();
        record(sink, SensorKind::Temperature, result, Measurement::Temperature)
    }

    pub fn read_humidity<K: DiagnosticSink>(&mut self, sink: &mut K) -> Reading<f32> {
        let result = self.sensors.climate.read_humidity();
        record(sink, SensorKind::Humidity, result, Measurement::Humidity)
    }

    pub fn read_pressure<K: DiagnosticSink>(&mut self, sink: &mut K) -> Reading<f32> {
        let result = if self.barometer_present {
            self.sensors.barometer.read_pascals().and_then(pascals_to_hpa)
        } else {
            Err(SensorError::NotDetected)
        };
        record(sink, SensorKind::Pressure, result, Measurement::Pressure)
    }

    pub fn read_motion<K: DiagnosticSink>(&mut self, sink: &mut K) -> Reading<bool> {
        let result = self.sensors.motion.read();
        record(sink, SensorKind::Motion, result, Measurement::Motion)
    }

    pub fn read_gas_level<K: DiagnosticSink>(&mut self, sink: &mut K) -> Reading<u16> {
        let result = self.sensors.gas.read();
        record(sink, SensorKind::GasLevel, result, Measurement::GasLevel)
    }

    pub fn read_soil_moisture<K: DiagnosticSink>(&mut self, sink: &mut K) -> Reading<u8> {
        let result = self.sensors.soil.read();
        record(sink, SensorKind::SoilMoisture, result, Measurement::SoilMoisture)
    }

    /// Hands the hardware back
    pub fn release(self) -> (Sensors<C, B, M, G, S>, D) {
        (self.sensors, self.delay)
    }

    fn settle(&mut self) {
        self.delay.delay_ms(self.settle_delay_ms);
    }
}

fn record<T: Copy, K: DiagnosticSink>(
    sink: &mut K,
    sensor: SensorKind,
    result: Result<T, SensorError>,
    measured: fn(T) -> Measurement,
) -> Reading<T> {
    match result {
        Ok(value) => sink.emit(Diagnostic::Measured(measured(value))),
        Err(error) => sink.emit(Diagnostic::ReadFailed { sensor, error }),
    }
    result.into()
}
