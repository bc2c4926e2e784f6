//! Application core: link protocol logic, zero direct I/O.
//!
//! All interaction with the serial line and the system timer happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable against the simulated peripheral.

pub mod channel;
pub mod legacy;
pub mod ports;
pub mod service;
