//! Best-effort view: fire-and-forget semantics of the block editor API.
//!
//! Ports are raw integers, nothing returns an error, and a failed sensor
//! read yields 0. The wire bytes are identical to the strict API; only
//! failure reporting differs. Every swallowed failure is logged.
//!
//! The start gate runs before the port check, so on an unstarted link an
//! invalid port still waits out the gate.

use core::time::Duration;

use log::warn;

use crate::error::{PortError, Result};
use crate::protocol::port::{FourPort, TwoPort};

use super::ports::{Clock, Transport};
use super::service::Hummingbird;

/// Borrowed from [`Hummingbird::best_effort`].
pub struct BestEffort<'a, T, C> {
    inner: &'a Hummingbird<T, C>,
}

impl<'a, T: Transport, C: Clock> BestEffort<'a, T, C> {
    pub fn new(inner: &'a Hummingbird<T, C>) -> Self {
        Self { inner }
    }

    /// Send the handshake; a failure leaves the channel unstarted.
    pub fn start(&self) {
        swallow("start", self.inner.start());
    }

    pub fn set_led(&self, port: i32, brightness: i32) {
        let r = self
            .gated_port::<FourPort>(port)
            .and_then(|p| self.inner.set_led(p, brightness));
        swallow("set_led", r);
    }

    pub fn set_tri_led(&self, port: i32, red: i32, green: i32, blue: i32) {
        let r = self
            .gated_port::<TwoPort>(port)
            .and_then(|p| self.inner.set_tri_led(p, red, green, blue));
        swallow("set_tri_led", r);
    }

    pub fn set_servo(&self, port: i32, angle: i32) {
        let r = self
            .gated_port::<FourPort>(port)
            .and_then(|p| self.inner.set_servo(p, angle));
        swallow("set_servo", r);
    }

    pub fn set_motor(&self, port: i32, speed: i32) {
        let r = self
            .gated_port::<TwoPort>(port)
            .and_then(|p| self.inner.set_motor(p, speed));
        swallow("set_motor", r);
    }

    pub fn set_vibration_motor(&self, port: i32, intensity: i32) {
        let r = self
            .gated_port::<TwoPort>(port)
            .and_then(|p| self.inner.set_vibration_motor(p, intensity));
        swallow("set_vibration_motor", r);
    }

    /// 0–100, or 0 when no reading could be taken.
    pub fn get_sensor(&self, port: i32) -> u8 {
        let r = self
            .gated_port::<FourPort>(port)
            .and_then(|p| self.inner.get_sensor(p));
        swallow("get_sensor", r).unwrap_or(0)
    }

    /// As [`get_sensor`](Self::get_sensor), giving up after `timeout`.
    pub fn get_sensor_within(&self, port: i32, timeout: Duration) -> u8 {
        let r = self
            .gated_port::<FourPort>(port)
            .and_then(|p| self.inner.get_sensor_within(p, timeout));
        swallow("get_sensor_within", r).unwrap_or(0)
    }

    /// Start gate first, then the port range.
    fn gated_port<P>(&self, port: i32) -> Result<P>
    where
        P: TryFrom<i32, Error = PortError>,
    {
        self.inner.channel().ensure_started()?;
        Ok(P::try_from(port)?)
    }
}

fn swallow<R>(op: &str, result: Result<R>) -> Option<R> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("{op} dropped: {e}");
            None
        }
    }
}
