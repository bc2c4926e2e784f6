//! Hummingbird controller: Main Entry Point
//!
//! Opens the UART link to the peripheral board and cycles the demo
//! routine: mirror sensor 1 on LED 1 and drive every actuator, then turn
//! everything off.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Adapters (outer ring)                               │
//! │  UartTransport (Transport)   SystemClock (Clock)     │
//! │  ──────────────── Port Trait Boundary ────────────── │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │  Hummingbird → CommandChannel (lock·deadline)  │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::Result;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use hummingbird::adapters::time::SystemClock;
use hummingbird::adapters::uart::UartTransport;
use hummingbird::app::ports::{Clock, Transport};
use hummingbird::config::LinkConfig;
use hummingbird::{FourPort, Hummingbird, TwoPort};

const DEMO_PERIOD: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Hummingbird link v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. UART to the peripheral board ───────────────────────
    // TX on GPIO17, RX on GPIO18; no flow control.
    let link_cfg = LinkConfig::default();
    let peripherals = Peripherals::take()?;
    let uart_cfg = UartConfig::default().baudrate(Hertz(link_cfg.baud_rate));
    let driver = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_cfg,
    )?;

    // ── 3. Start the link ─────────────────────────────────────
    let bird = Hummingbird::new(UartTransport::new(driver), SystemClock::new(), link_cfg)?;
    bird.start()?;

    // ── 4. Demo loop ──────────────────────────────────────────
    let mut lit = false;
    loop {
        lit = !lit;
        let outcome = if lit { all_on(&bird) } else { all_off(&bird) };
        if let Err(e) = outcome {
            warn!("demo step failed: {}", e);
        }
        match serde_json::to_string(&bird.stats()) {
            Ok(json) => info!("link stats: {}", json),
            Err(e) => warn!("stats encoding failed: {}", e),
        }
        bird.channel().clock().pause(DEMO_PERIOD);
    }
}

/// Turn on at least one of every output and show sensor 1 on LED 1.
fn all_on<T: Transport, C: Clock>(bird: &Hummingbird<T, C>) -> hummingbird::Result<()> {
    let reading = bird.get_sensor(FourPort::One)?;
    info!("sensor 1: {}%", reading);
    bird.set_led(FourPort::One, i32::from(reading))?;
    bird.set_tri_led(TwoPort::Two, 50, 50, 50)?;
    bird.set_servo(FourPort::One, 180)?;
    bird.set_motor(TwoPort::Two, -100)?;
    bird.set_vibration_motor(TwoPort::One, 35)
}

/// Turn off all outputs and park the servo at 0°.
fn all_off<T: Transport, C: Clock>(bird: &Hummingbird<T, C>) -> hummingbird::Result<()> {
    bird.set_led(FourPort::One, 0)?;
    bird.set_tri_led(TwoPort::Two, 0, 0, 0)?;
    bird.set_servo(FourPort::One, 0)?;
    bird.set_motor(TwoPort::Two, 0)?;
    bird.set_vibration_motor(TwoPort::One, 0)
}
