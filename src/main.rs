#![no_std]
#![no_main]

use bsp::entry;
use core::cell::RefCell;
use core::convert::Infallible;
use defmt::*;
use defmt_rtt as _;
use embedded_hal::delay::DelayNs;
use embedded_hal_0_2::adc::OneShot;
use panic_probe as _;

// Alias for the BSP so another RP2040 board only touches this line
use rp_pico as bsp;

use bsp::hal::{
    adc::{Adc, AdcPin},
    clocks::{init_clocks_and_plls, Clock},
    fugit::RateExtU32,
    gpio::{AnyPin, InOutPin},
    pac,
    pio::PIOExt,
    watchdog::Watchdog,
    Sio, Timer,
};
use envnode::config::{NodeConfig, BMP280_ADDRESS};
use envnode::diagnostics::{DefmtSink, Diagnostic, DiagnosticSink};
use envnode::drivers::{AnalogInput, Bmp280, Dht22, GasSensor, PirSensor, SoilMoistureSensor};
use envnode::rendering::render_summary;
use envnode::{run_cycle, Report, Sampler, SensorError, Sensors, Uplink};
use i2c_pio::I2C;

// Pin assignments
// GPIO4  DHT22 data (external 10k pull-up)
// GPIO5  PIR output
// GPIO8  I2C SDA (BMP280)
// GPIO9  I2C SCL (BMP280)
// GPIO26 ADC0 gas sensor
// GPIO27 ADC1 soil moisture probe

/// One channel of the shared ADC
struct PicoAnalog<'a, P: AnyPin> {
    adc: &'a RefCell<Adc>,
    pin: AdcPin<P>,
}

impl<P: AnyPin> AnalogInput for PicoAnalog<'_, P>
where
    Adc: OneShot<Adc, u16, AdcPin<P>>,
{
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        nb::block!(self.adc.borrow_mut().read(&mut self.pin)).map_err(|_| SensorError::Bus)
    }
}

/// Stand-in for the network transport: prints the report summary over RTT
struct RttUplink;

impl Uplink for RttUplink {
    type Error = Infallible;

    fn send(&mut self, report: &Report<'_>) -> Result<(), Self::Error> {
        let line = render_summary(&report.sensors, &report.conditions);
        info!("[{=str}] {=str}", report.device_id, line.as_str());
        Ok(())
    }
}

/// Routine diagnostics only in debug mode, warnings always
struct BoardSink {
    debug: bool,
}

impl DiagnosticSink for BoardSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if self.debug || diagnostic.is_warning() {
            DefmtSink.emit(diagnostic);
        }
    }
}

#[entry]
fn main() -> ! {
    info!("Environment node starting");
    let config = NodeConfig::default();
    if let Err(error) = config.timing.check() {
        warn!("Timing: {}", error);
    }

    // Grab our singleton objects
    let mut pac = pac::Peripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // Configure the clocks
    //
    // The default is to generate a 125 MHz system clock
    let clocks = init_clocks_and_plls(
        bsp::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // The single-cycle I/O block controls our GPIO pins
    let sio = Sio::new(pac.SIO);

    // Set the pins up according to their function on this particular board
    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut delay = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let (mut pio, sm0, _, _, _) = pac.PIO0.split(&mut pac.RESETS);

    let i2c_pio = I2C::new(
        &mut pio,
        pins.gpio8,
        pins.gpio9,
        sm0,
        100.kHz(),
        clocks.system_clock.freq(),
    );

    let adc = RefCell::new(Adc::new(pac.ADC, &mut pac.RESETS));

    let sensors = Sensors {
        climate: Dht22::new(InOutPin::new(pins.gpio4), delay),
        barometer: Bmp280::new(i2c_pio, BMP280_ADDRESS),
        motion: PirSensor::new(pins.gpio5.into_pull_down_input()),
        gas: GasSensor::new(PicoAnalog {
            adc: &adc,
            pin: AdcPin::new(pins.gpio26.into_floating_input()).unwrap(),
        }),
        soil: SoilMoistureSensor::new(PicoAnalog {
            adc: &adc,
            pin: AdcPin::new(pins.gpio27.into_floating_input()).unwrap(),
        }),
    };

    let mut sink = BoardSink {
        debug: config.debug,
    };
    let mut sampler = Sampler::init(sensors, delay, &config.timing, &mut sink);
    let mut uplink = RttUplink;

    info!("Environment node ready");

    loop {
        let cycle = run_cycle(&mut sampler, &config, &mut uplink, &mut sink);
        if cycle.result.alert() {
            warn!("{} threshold(s) breached", cycle.result.len());
        }
        delay.delay_ms(config.timing.send_interval_ms);
    }
}
