//! Hummingbird link library.
//!
//! Drives a Hummingbird peripheral board (LEDs, tri-colour LEDs, servos,
//! DC and vibration motors, analog sensors) over a point-to-point serial
//! line. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]`; everything else runs on the host against
//! the simulated peripheral.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod protocol;

pub use app::service::Hummingbird;
pub use error::{Error, Result};
pub use protocol::port::{FourPort, TwoPort};
