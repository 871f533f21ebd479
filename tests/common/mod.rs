//! Fake hardware for integration tests
//!
//! Every fake appends to a shared bus log so tests can check the order of
//! reads and the pauses between them.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use envnode::drivers::{AnalogInput, Barometer, ClimateSensor, GasSensor, PirSensor, SoilMoistureSensor};
use envnode::{SensorError, SensorKind, Sensors};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BusEvent {
    Probe,
    Read(SensorKind),
    DelayMs(u32),
}

pub type BusLog = Rc<RefCell<Vec<BusEvent>>>;

pub fn bus_log() -> BusLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub struct FakeClimate {
    pub log: BusLog,
    pub temperature: Result<f32, SensorError>,
    pub humidity: Result<f32, SensorError>,
}

impl ClimateSensor for FakeClimate {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.log.borrow_mut().push(BusEvent::Read(SensorKind::Temperature));
        self.temperature
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.log.borrow_mut().push(BusEvent::Read(SensorKind::Humidity));
        self.humidity
    }
}

pub struct FakeBarometer {
    pub log: BusLog,
    pub present: bool,
    pub pascals: Result<f32, SensorError>,
}

impl Barometer for FakeBarometer {
    fn address(&self) -> u8 {
        0x76
    }

    fn probe(&mut self) -> Result<(), SensorError> {
        self.log.borrow_mut().push(BusEvent::Probe);
        if self.present {
            Ok(())
        } else {
            Err(SensorError::NotDetected)
        }
    }

    fn read_pascals(&mut self) -> Result<f32, SensorError> {
        self.log.borrow_mut().push(BusEvent::Read(SensorKind::Pressure));
        self.pascals
    }
}

pub struct FakePir {
    pub log: BusLog,
    pub high: bool,
}

impl ErrorType for FakePir {
    type Error = Infallible;
}

impl InputPin for FakePir {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.log.borrow_mut().push(BusEvent::Read(SensorKind::Motion));
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct FakeAdc {
    pub log: BusLog,
    pub sensor: SensorKind,
    pub raw: Result<u16, SensorError>,
}

impl AnalogInput for FakeAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.log.borrow_mut().push(BusEvent::Read(self.sensor));
        self.raw
    }
}

/// Logs whole-millisecond delays, the only kind the sampler uses
pub struct FakeDelay {
    pub log: BusLog,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(BusEvent::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(BusEvent::DelayMs(ms));
    }
}

pub type FakeSensors = Sensors<FakeClimate, FakeBarometer, FakePir, FakeAdc, FakeAdc>;

/// What each fake returns
#[derive(Debug, Clone, Copy)]
pub struct Bench {
    pub temperature: Result<f32, SensorError>,
    pub humidity: Result<f32, SensorError>,
    pub barometer_present: bool,
    pub pascals: Result<f32, SensorError>,
    pub motion: bool,
    pub gas_raw: Result<u16, SensorError>,
    pub soil_raw: Result<u16, SensorError>,
}

impl Default for Bench {
    fn default() -> Self {
        Bench {
            temperature: Ok(21.5),
            humidity: Ok(48.0),
            barometer_present: true,
            pascals: Ok(101_300.0),
            motion: false,
            gas_raw: Ok(150),
            soil_raw: Ok(1638),
        }
    }
}

impl Bench {
    pub fn build(&self, log: &BusLog) -> (FakeSensors, FakeDelay) {
        let sensors = Sensors {
            climate: FakeClimate {
                log: log.clone(),
                temperature: self.temperature,
                humidity: self.humidity,
            },
            barometer: FakeBarometer {
                log: log.clone(),
                present: self.barometer_present,
                pascals: self.pascals,
            },
            motion: PirSensor::new(FakePir {
                log: log.clone(),
                high: self.motion,
            }),
            gas: GasSensor::new(FakeAdc {
                log: log.clone(),
                sensor: SensorKind::GasLevel,
                raw: self.gas_raw,
            }),
            soil: SoilMoistureSensor::new(FakeAdc {
                log: log.clone(),
                sensor: SensorKind::SoilMoisture,
                raw: self.soil_raw,
            }),
        };
        (sensors, FakeDelay { log: log.clone() })
    }
}
