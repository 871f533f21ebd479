#![cfg_attr(not(test), no_std)]

//! # envnode
//! ## Sensor acquisition and threshold evaluation for an environmental monitoring node
//!
//! Features:
//! - Temperature and humidity (DHT22, single-wire)
//! - Barometric pressure (BMP280 or BME680, I2C)
//! - Motion (PIR, digital input)
//! - Gas concentration and soil moisture (analog)
//! - Safety thresholds with per-condition alerts
//! - Collector-ready reports
//!
//! A failed sensor never stops the node: its field in the snapshot is
//! `Reading::Failed` and the other sensors are still reported.

pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod evaluator;
pub mod node;
pub mod reading;
pub mod rendering;
pub mod report;
pub mod sampler;
pub mod snapshot;

pub use config::{NodeConfig, ThresholdConfig, TimingConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, NullSink, SensorKind};
pub use error::{ConfigError, SensorError};
pub use evaluator::{evaluate, AlertResult, Condition};
pub use node::{run_cycle, Cycle};
pub use reading::Reading;
pub use report::{Report, Uplink};
pub use sampler::{Sampler, Sensors};
pub use snapshot::Snapshot;
