//! Hummingbird service: the public device-control API.
//!
//! [`Hummingbird`] turns actuator and sensor requests into [`Command`]s and
//! pushes them through the [`CommandChannel`]. All methods take `&self`,
//! so one instance can be shared (e.g. behind an `Arc`) by every task that
//! drives the board.
//!
//! ```text
//!  caller ──▶ ┌──────────────┐ ──▶ ┌────────────────┐ ──▶ Transport
//!             │  Hummingbird  │     │ CommandChannel │
//!  caller ◀── │  clamp·scale  │ ◀── │ lock·deadline  │ ◀── Clock
//!             └──────────────┘     └────────────────┘
//! ```

use core::time::Duration;

use log::debug;

use crate::config::LinkConfig;
use crate::diagnostics::StatsSnapshot;
use crate::error::Result;
use crate::protocol::frame::Command;
use crate::protocol::port::{FourPort, TwoPort};
use crate::protocol::scaling::byte_to_percent;

use super::channel::CommandChannel;
use super::legacy::BestEffort;
use super::ports::{Clock, Transport};

/// Parameter values the block editor pre-fills for each operation.
pub mod defaults {
    pub const LED_BRIGHTNESS: i32 = 50;
    pub const TRI_LED_RGB: (i32, i32, i32) = (50, 0, 50);
    pub const SERVO_ANGLE: i32 = 90;
    pub const MOTOR_SPEED: i32 = 90;
    pub const VIBRATION_INTENSITY: i32 = 50;
}

// ───────────────────────────────────────────────────────────────
// Hummingbird
// ───────────────────────────────────────────────────────────────

/// Controller-side handle to a Hummingbird peripheral board.
pub struct Hummingbird<T, C> {
    channel: CommandChannel<T, C>,
}

impl<T: Transport, C: Clock> Hummingbird<T, C> {
    pub fn new(transport: T, clock: C, config: LinkConfig) -> Result<Self> {
        Ok(Self {
            channel: CommandChannel::new(transport, clock, config)?,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Open the link. Must run before any other operation succeeds.
    pub fn start(&self) -> Result<()> {
        self.channel.start()
    }

    pub fn is_started(&self) -> bool {
        self.channel.is_started()
    }

    // ── Actuators ─────────────────────────────────────────────

    /// Single-colour LED, brightness 0–100 %.
    pub fn set_led(&self, port: FourPort, brightness: i32) -> Result<()> {
        self.channel.send(&Command::Led { port, brightness })
    }

    /// Tri-colour LED, each channel 0–100 %.
    pub fn set_tri_led(&self, port: TwoPort, red: i32, green: i32, blue: i32) -> Result<()> {
        self.channel.send(&Command::TriLed {
            port,
            red,
            green,
            blue,
        })
    }

    /// Hobby servo, 0–180°.
    pub fn set_servo(&self, port: FourPort, angle: i32) -> Result<()> {
        self.channel.send(&Command::Servo { port, angle })
    }

    /// DC motor, -100–100; negative runs in reverse.
    pub fn set_motor(&self, port: TwoPort, speed: i32) -> Result<()> {
        self.channel.send(&Command::Motor { port, speed })
    }

    /// Vibration motor, 0–100 %.
    pub fn set_vibration_motor(&self, port: TwoPort, intensity: i32) -> Result<()> {
        self.channel.send(&Command::Vibration { port, intensity })
    }

    // ── Sensors ───────────────────────────────────────────────

    /// Sensor reading 0–100 %, linear in the 0–5 V port voltage.
    pub fn get_sensor(&self, port: FourPort) -> Result<u8> {
        self.get_sensor_within(port, self.channel.config().sensor_read_timeout())
    }

    /// As [`get_sensor`](Self::get_sensor), abandoning the read after `timeout`.
    pub fn get_sensor_within(&self, port: FourPort, timeout: Duration) -> Result<u8> {
        let raw = self.channel.query_sensor(port, timeout)?;
        let percent = byte_to_percent(raw);
        debug!("sensor {:?}: raw={} -> {}%", port, raw, percent);
        Ok(percent)
    }

    // ── Views & queries ───────────────────────────────────────

    /// Silent-failure view matching the block editor semantics.
    pub fn best_effort(&self) -> BestEffort<'_, T, C> {
        BestEffort::new(self)
    }

    pub fn channel(&self) -> &CommandChannel<T, C> {
        &self.channel
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.channel.stats()
    }
}
