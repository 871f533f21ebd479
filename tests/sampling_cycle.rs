//! Integration tests for the sampling cycle
//!
//! Drives `Sampler` and `run_cycle` end to end over fake hardware and checks
//! read order, settling pauses, failure isolation and report delivery.

#![cfg(test)]

mod common;

use common::{bus_log, Bench, BusEvent};
use envnode::{
    run_cycle, Condition, Diagnostic, MemorySink, NodeConfig, Reading, Report, Sampler,
    SensorError, SensorKind, TimingConfig, Uplink,
};

#[derive(Default)]
struct RecordingUplink {
    reports: Vec<serde_json::Value>,
    refuse: bool,
}

#[derive(Debug)]
struct Refused;

impl Uplink for RecordingUplink {
    type Error = Refused;

    fn send(&mut self, report: &Report<'_>) -> Result<(), Self::Error> {
        if self.refuse {
            return Err(Refused);
        }
        self.reports
            .push(serde_json::to_value(report).expect("report serializes"));
        Ok(())
    }
}

#[test]
fn test_init_probes_then_warms_up() {
    let log = bus_log();
    let (sensors, delay) = Bench::default().build(&log);
    let mut sink = MemorySink::<32>::new();

    let sampler = Sampler::init(sensors, delay, &TimingConfig::default(), &mut sink);

    assert!(sampler.barometer_present());
    assert_eq!(
        log.borrow().as_slice(),
        &[BusEvent::Probe, BusEvent::DelayMs(2_000)]
    );
    assert!(sink
        .entries()
        .contains(&Diagnostic::WarmingUp { ms: 2_000 }));
    assert!(!sink.entries().iter().any(Diagnostic::is_warning));
}

#[test]
fn test_reads_in_fixed_order_with_settle_pauses() {
    let log = bus_log();
    let (sensors, delay) = Bench::default().build(&log);
    let mut sink = MemorySink::<32>::new();
    let mut sampler = Sampler::init(sensors, delay, &TimingConfig::default(), &mut sink);
    log.borrow_mut().clear();

    sampler.read_all(&mut sink);

    let expected = [
        BusEvent::Read(SensorKind::Temperature),
        BusEvent::DelayMs(100),
        BusEvent::Read(SensorKind::Humidity),
        BusEvent::DelayMs(100),
        BusEvent::Read(SensorKind::Pressure),
        BusEvent::DelayMs(100),
        BusEvent::Read(SensorKind::Motion),
        BusEvent::DelayMs(100),
        BusEvent::Read(SensorKind::GasLevel),
        BusEvent::DelayMs(100),
        BusEvent::Read(SensorKind::SoilMoisture),
    ];
    assert_eq!(log.borrow().as_slice(), &expected);
}

#[test]
fn test_order_is_the_same_on_every_cycle() {
    let log = bus_log();
    let (sensors, delay) = Bench::default().build(&log);
    let mut sampler = Sampler::init(
        sensors,
        delay,
        &TimingConfig::default(),
        &mut envnode::NullSink,
    );
    log.borrow_mut().clear();

    sampler.read_all(&mut envnode::NullSink);
    let first: Vec<BusEvent> = log.borrow_mut().drain(..).collect();
    sampler.read_all(&mut envnode::NullSink);
    let second: Vec<BusEvent> = log.borrow_mut().drain(..).collect();

    assert_eq!(first, second);
}

#[test]
fn test_settle_pause_follows_timing_config() {
    let log = bus_log();
    let (sensors, delay) = Bench::default().build(&log);
    let timing = TimingConfig {
        settle_delay_ms: 25,
        warmup_ms: 0,
        ..TimingConfig::default()
    };
    let mut sampler = Sampler::init(sensors, delay, &timing, &mut envnode::NullSink);
    log.borrow_mut().clear();

    sampler.read_all(&mut envnode::NullSink);

    let pauses: Vec<u32> = log
        .borrow()
        .iter()
        .filter_map(|event| match event {
            BusEvent::DelayMs(ms) => Some(*ms),
            _ => None,
        })
        .collect();
    assert_eq!(pauses, vec![25; 5]);
}

#[test]
fn test_healthy_snapshot_values() {
    let log = bus_log();
    let (sensors, delay) = Bench::default().build(&log);
    let mut sink = MemorySink::<32>::new();
    let mut sampler = Sampler::init(sensors, delay, &TimingConfig::default(), &mut sink);

    let snapshot = sampler.read_all(&mut sink);

    assert_eq!(snapshot.temperature(), Reading::Ok(21.5));
    assert_eq!(snapshot.humidity(), Reading::Ok(48.0));
    assert_eq!(snapshot.pressure(), Reading::Ok(1013.0));
    assert_eq!(snapshot.motion(), Reading::Ok(false));
    assert_eq!(snapshot.gas_level(), Reading::Ok(150));
    assert_eq!(snapshot.soil_moisture(), Reading::Ok(60));
    assert_eq!(snapshot.failed_count(), 0);
}

#[test]
fn test_failed_temperature_does_not_stop_the_cycle() {
    let log = bus_log();
    let bench = Bench {
        temperature: Err(SensorError::NotANumber),
        ..Bench::default()
    };
    let (sensors, delay) = bench.build(&log);
    let mut sink = MemorySink::<32>::new();
    let mut sampler = Sampler::init(sensors, delay, &TimingConfig::default(), &mut sink);
    sink.clear();

    let snapshot = sampler.read_all(&mut sink);

    assert_eq!(
        snapshot.temperature(),
        Reading::Failed(SensorError::NotANumber)
    );
    assert_eq!(snapshot.temperature().or_sentinel(), 0.0);
    assert_eq!(snapshot.humidity(), Reading::Ok(48.0));
    assert_eq!(snapshot.soil_moisture(), Reading::Ok(60));
    assert_eq!(snapshot.failed_count(), 1);
    assert!(sink.entries().contains(&Diagnostic::ReadFailed {
        sensor: SensorKind::Temperature,
        error: SensorError::NotANumber,
    }));
    // Every sensor was still visited
    let reads = log
        .borrow()
        .iter()
        .filter(|event| matches!(event, BusEvent::Read(_)))
        .count();
    assert_eq!(reads, 6);
}

#[test]
fn test_failed_gas_channel_leaves_other_sensors_intact() {
    let log = bus_log();
    let bench = Bench {
        gas_raw: Err(SensorError::Bus),
        ..Bench::default()
    };
    let (sensors, delay) = bench.build(&log);
    let mut sink = MemorySink::<32>::new();
    let mut sampler = Sampler::init(sensors, delay, &TimingConfig::default(), &mut sink);
    log.borrow_mut().clear();

    let snapshot = sampler.read_all(&mut sink);

    assert_eq!(snapshot.gas_level(), Reading::Failed(SensorError::Bus));
    assert_eq!(snapshot.temperature(), Reading::Ok(21.5));
    assert_eq!(snapshot.humidity(), Reading::Ok(48.0));
    assert_eq!(snapshot.pressure(), Reading::Ok(1013.0));
    assert_eq!(snapshot.motion(), Reading::Ok(false));
    assert_eq!(snapshot.soil_moisture(), Reading::Ok(60));
    assert_eq!(snapshot.failed_count(), 1);
    assert!(sink.entries().contains(&Diagnostic::ReadFailed {
        sensor: SensorKind::GasLevel,
        error: SensorError::Bus,
    }));

    // Soil is still read after the failed gas channel, behind its pause
    let events = log.borrow();
    assert_eq!(
        &events[events.len() - 3..],
        &[
            BusEvent::Read(SensorKind::GasLevel),
            BusEvent::DelayMs(100),
            BusEvent::Read(SensorKind::SoilMoisture),
        ]
    );
    let pauses = events
        .iter()
        .filter(|event| matches!(event, BusEvent::DelayMs(_)))
        .count();
    assert_eq!(pauses, 5);
}

#[test]
fn test_missing_barometer_skips_pressure_reads() {
    let log = bus_log();
    let bench = Bench {
        barometer_present: false,
        ..Bench::default()
    };
    let (sensors, delay) = bench.build(&log);
    let mut sink = MemorySink::<32>::new();
    let mut sampler = Sampler::init(sensors, delay, &TimingConfig::default(), &mut sink);

    assert!(!sampler.barometer_present());
    assert!(sink.entries().contains(&Diagnostic::DeviceAbsent {
        sensor: SensorKind::Pressure,
        address: 0x76,
    }));

    log.borrow_mut().clear();
    let snapshot = sampler.read_all(&mut sink);

    assert_eq!(
        snapshot.pressure(),
        Reading::Failed(SensorError::NotDetected)
    );
    assert!(!log
        .borrow()
        .contains(&BusEvent::Read(SensorKind::Pressure)));
    // The pause schedule does not depend on which sensors answered
    let pauses = log
        .borrow()
        .iter()
        .filter(|event| matches!(event, BusEvent::DelayMs(_)))
        .count();
    assert_eq!(pauses, 5);
}

#[test]
fn test_run_cycle_delivers_report() {
    let log = bus_log();
    let bench = Bench {
        temperature: Ok(36.2),
        soil_raw: Ok(4095),
        ..Bench::default()
    };
    let (sensors, delay) = bench.build(&log);
    let config = NodeConfig::default();
    let mut sink = MemorySink::<64>::new();
    let mut sampler = Sampler::init(sensors, delay, &config.timing, &mut sink);
    let mut uplink = RecordingUplink::default();

    let cycle = run_cycle(&mut sampler, &config, &mut uplink, &mut sink);

    assert!(cycle.delivered);
    assert!(cycle.result.contains(Condition::TemperatureHigh));
    assert!(cycle.result.contains(Condition::SoilDry));
    assert_eq!(cycle.result.len(), 2);
    assert_eq!(
        sink.alerts().collect::<Vec<_>>(),
        vec![Condition::TemperatureHigh, Condition::SoilDry]
    );

    assert_eq!(uplink.reports.len(), 1);
    let report = &uplink.reports[0];
    assert_eq!(report["device_id"], "ESP32_001");
    assert_eq!(report["alert"], true);
    assert_eq!(
        report["conditions"],
        serde_json::json!(["temperature_high", "soil_dry"])
    );
    assert_eq!(report["sensors"]["soilMoisture"], 0);
}

#[test]
fn test_run_cycle_survives_refused_report() {
    let log = bus_log();
    let (sensors, delay) = Bench::default().build(&log);
    let config = NodeConfig::default();
    let mut sink = MemorySink::<64>::new();
    let mut sampler = Sampler::init(sensors, delay, &config.timing, &mut sink);
    let mut uplink = RecordingUplink {
        refuse: true,
        ..RecordingUplink::default()
    };

    let cycle = run_cycle(&mut sampler, &config, &mut uplink, &mut sink);

    assert!(!cycle.delivered);
    assert!(!cycle.result.alert());
    assert_eq!(cycle.snapshot.failed_count(), 0);
    assert_eq!(sink.entries().last(), Some(&Diagnostic::UplinkFailed));

    // The next cycle still runs
    uplink.refuse = false;
    let cycle = run_cycle(&mut sampler, &config, &mut uplink, &mut sink);
    assert!(cycle.delivered);
    assert_eq!(uplink.reports.len(), 1);
}
