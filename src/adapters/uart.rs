//! ESP-IDF UART transport.
//!
//! Wraps an `esp_idf_hal` [`UartDriver`] already bound to its TX/RX pins.
//! The driver keeps its own RX ring buffer, so a sensor reply that arrives
//! between polls is not lost.

use core::time::Duration;

use esp_idf_hal::delay::{BLOCK, TickType};
use esp_idf_hal::uart::UartDriver;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::EspError;
use log::info;

use crate::app::ports::Transport;

pub struct UartTransport<'d> {
    driver: UartDriver<'d>,
}

impl<'d> UartTransport<'d> {
    pub fn new(driver: UartDriver<'d>) -> Self {
        Self { driver }
    }
}

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.driver.write(data)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, EspError> {
        self.driver.read(buf, TickType::from(timeout).ticks())
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.driver.wait_tx_done(BLOCK)
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), EspError> {
        let applied = self.driver.change_baudrate(Hertz(baud))?;
        info!("uart: baud rate {}", applied.0);
        Ok(())
    }
}
